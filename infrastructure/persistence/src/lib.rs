pub mod db;
pub mod retry;
pub mod product {
    pub mod entity;
    pub mod repository;
}
