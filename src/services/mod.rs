pub mod checkout_service;
pub mod summary_service;
