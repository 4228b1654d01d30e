pub mod cart_items;
pub mod checkout_items;
pub mod checkouts;
pub mod products;
pub mod users;

pub use cart_items::Entity as CartItems;
pub use checkout_items::Entity as CheckoutItems;
pub use checkouts::Entity as Checkouts;
pub use products::Entity as Products;
pub use users::Entity as Users;
