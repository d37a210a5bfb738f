// @generated by dpgen. Do not edit.

pub mod asetek_pro;
pub mod hydro_link;
