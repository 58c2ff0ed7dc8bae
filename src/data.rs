pub mod domain;
pub mod feed;
pub mod indicator;
pub mod record;
