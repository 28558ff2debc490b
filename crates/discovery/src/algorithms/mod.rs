pub mod similarity;
pub mod single_linkage;
pub mod union_find;
