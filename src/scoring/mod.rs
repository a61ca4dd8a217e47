pub mod accuracy;
pub mod normalize;
pub mod speed;
pub mod timing;
