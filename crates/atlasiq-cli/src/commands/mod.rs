pub mod lookup;
pub mod normalize;
pub mod risk;
