pub mod config;
pub mod drawing;
pub mod error;
pub mod game;
pub mod http_client;
pub mod lottery;
pub mod megamillions;
pub mod powerball;
pub mod prize;
pub mod ticket;
pub mod upstream;
