//! Entity definitions.
//!
//! One module per table. Each follows the same split: an iden enum naming
//! the table and its columns, a read `Model` hydrated from result rows, a
//! `New*` insert payload, and the entity's operations.

pub mod category;
pub mod customer;
pub mod order;
pub mod order_item;
pub mod product;
pub mod product_detail;
pub mod product_supplier;
pub mod product_tag;
pub mod review;
pub mod supplier;
pub mod tag;
pub mod user;

pub use category::{Categories, CategoryModel, NewCategory};
pub use customer::{CustomerModel, Customers, NewCustomer};
pub use order::{NewOrder, OrderLine, OrderModel, OrderStatus, Orders};
pub use order_item::{NewOrderItem, OrderItemModel, OrderItems};
pub use product::{NewProduct, ProductModel, Products};
pub use product_detail::{NewProductDetail, ProductDetailModel, ProductDetails};
pub use product_supplier::{NewProductSupplier, ProductSupplierModel, ProductSuppliers};
pub use product_tag::{ProductTagModel, ProductTags};
pub use review::{NewReview, ReviewModel, Reviews};
pub use supplier::{NewSupplier, SupplierModel, Suppliers};
pub use tag::{NewTag, TagModel, Tags};
pub use user::{NewUser, UserModel, Users};
