// @generated by dpgen. Do not edit.

pub mod all;
pub mod aquacool_240;
pub mod aquacool_360;
