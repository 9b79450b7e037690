pub mod budget;
pub mod cache;
pub mod logistics;
pub mod map;
pub mod places;
pub mod planner;
pub mod trip_store;
