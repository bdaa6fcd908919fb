//! Contract calls the service reads or asks wallets to send.

use alloy_sol_types::sol;

sol! {
    /// ERC-20 subset used for allowance checks and approvals.
    interface IERC20 {
        function allowance(address owner, address spender) external view returns (uint256);
        function approve(address spender, uint256 amount) external returns (bool);
    }

    /// ERC-721 operator approval.
    interface IERC721 {
        function isApprovedForAll(address owner, address operator) external view returns (bool);
        function setApprovalForAll(address operator, bool approved) external;
    }

    /// Deposit entry points of the points vault.
    interface IPointsVault {
        function contribute(address token, uint256 amount) external;
        function donate(address token, uint256 amount) external;
        function depositNft(address collection, uint256 tokenId) external;
        function donateNft(address collection, uint256 tokenId) external;
    }
}
