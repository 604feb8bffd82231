#![allow(dead_code)]
use alloy::sol;

sol!(
    #[sol(rpc)]
    contract Kindlink {
        error OwnableUnauthorizedAccount(address account);
        error OwnableInvalidOwner(address owner);

        #[derive(Debug, PartialEq)]
        event OwnershipTransferred(address indexed previousOwner, address indexed newOwner);

        function owner() external view returns (address owner);
        function transferOwnership(address newOwner) external;
        function renounceOwnership() external;
    }
);
