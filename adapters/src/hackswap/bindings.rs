alloy::sol! {
    #[allow(missing_docs)]
    #[sol(rpc)]
    interface HackSwap {
        function getVolatilityFee() external view returns (uint256);
        function getLatestPrice() external view returns (int256);
        function swap(uint256 amountIn, uint256 minAmountOut) external;
        function tokenA() external view returns (address);
        function tokenB() external view returns (address);
    }
}
