//! Schema definition: tables, constraints, indexes, triggers.
//!
//! Everything the data model guarantees is enforced here, at the storage
//! layer: uniqueness, referential-integrity deletion policy (block /
//! cascade / nullify), numeric `CHECK` ranges, server-assigned timestamps,
//! and `updated_at` refresh triggers. Application-level validation merely
//! fails earlier with nicer messages.
//!
//! Statement builders render through [`SqliteQueryBuilder`]; triggers are
//! raw SQL since the builder does not model them.

use sea_query::{
    ColumnDef, Expr, ForeignKey, ForeignKeyAction, Index, IndexCreateStatement, SimpleExpr,
    SqliteQueryBuilder, Table, TableCreateStatement,
};

use crate::entity::category::Categories;
use crate::entity::customer::Customers;
use crate::entity::order::{OrderStatus, Orders};
use crate::entity::order_item::OrderItems;
use crate::entity::product::Products;
use crate::entity::product_detail::ProductDetails;
use crate::entity::product_supplier::ProductSuppliers;
use crate::entity::product_tag::ProductTags;
use crate::entity::review::Reviews;
use crate::entity::supplier::Suppliers;
use crate::entity::tag::Tags;
use crate::entity::user::Users;
use crate::error::StoreError;
use crate::executor::StoreExecutor;
use crate::value::NOW_EXPR;

/// Column default assigning the current time; parenthesized as SQLite
/// requires for expression defaults.
fn now_default() -> SimpleExpr {
    let expr = format!("({NOW_EXPR})");
    Expr::cust(expr.as_str())
}

fn users() -> TableCreateStatement {
    Table::create()
        .table(Users::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Users::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Users::Username)
                .string_len(150)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Users::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .to_owned()
}

fn suppliers() -> TableCreateStatement {
    Table::create()
        .table(Suppliers::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Suppliers::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Suppliers::CompanyName)
                .string_len(200)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Suppliers::ContactName).string_len(100))
        .col(ColumnDef::new(Suppliers::Phone).string_len(20))
        .col(ColumnDef::new(Suppliers::Email).string_len(254))
        .col(ColumnDef::new(Suppliers::Address).text())
        .col(ColumnDef::new(Suppliers::CreatedBy).integer())
        .col(
            ColumnDef::new(Suppliers::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Suppliers::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Suppliers::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_suppliers_created_by")
                .from(Suppliers::Table, Suppliers::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn categories() -> TableCreateStatement {
    Table::create()
        .table(Categories::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Categories::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Categories::Name)
                .string_len(100)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Categories::Description).text())
        .col(ColumnDef::new(Categories::MainSupplierId).integer())
        .col(ColumnDef::new(Categories::CreatedBy).integer())
        .col(
            ColumnDef::new(Categories::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Categories::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Categories::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_categories_main_supplier")
                .from(Categories::Table, Categories::MainSupplierId)
                .to(Suppliers::Table, Suppliers::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_categories_created_by")
                .from(Categories::Table, Categories::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn products() -> TableCreateStatement {
    Table::create()
        .table(Products::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Products::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Products::Name).string_len(200).not_null())
        .col(ColumnDef::new(Products::Description).text())
        .col(
            ColumnDef::new(Products::Price)
                .decimal_len(10, 2)
                .not_null()
                .check(Expr::col(Products::Price).gte(0)),
        )
        .col(ColumnDef::new(Products::CategoryId).integer().not_null())
        .col(
            ColumnDef::new(Products::StockQuantity)
                .integer()
                .not_null()
                .default(0)
                .check(Expr::col(Products::StockQuantity).gte(0)),
        )
        .col(ColumnDef::new(Products::CreatedBy).integer())
        .col(
            ColumnDef::new(Products::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Products::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Products::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_products_category")
                .from(Products::Table, Products::CategoryId)
                .to(Categories::Table, Categories::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_products_created_by")
                .from(Products::Table, Products::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn product_details() -> TableCreateStatement {
    Table::create()
        .table(ProductDetails::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(ProductDetails::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(ProductDetails::ProductId)
                .integer()
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(ProductDetails::WeightKg).decimal_len(8, 3))
        .col(ColumnDef::new(ProductDetails::Dimensions).string_len(50))
        .col(ColumnDef::new(ProductDetails::Manufacturer).string_len(100))
        .col(
            ColumnDef::new(ProductDetails::WarrantyMonths)
                .integer()
                .check(Expr::col(ProductDetails::WarrantyMonths).gte(0)),
        )
        .col(
            ColumnDef::new(ProductDetails::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(ProductDetails::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_product_details_product")
                .from(ProductDetails::Table, ProductDetails::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn product_suppliers() -> TableCreateStatement {
    Table::create()
        .table(ProductSuppliers::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(ProductSuppliers::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(ProductSuppliers::ProductId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(ProductSuppliers::SupplierId)
                .integer()
                .not_null(),
        )
        .col(
            ColumnDef::new(ProductSuppliers::PurchasePrice)
                .decimal_len(10, 2)
                .not_null()
                .check(Expr::col(ProductSuppliers::PurchasePrice).gte(0)),
        )
        .col(
            ColumnDef::new(ProductSuppliers::DeliveryDays)
                .integer()
                .not_null()
                .default(0)
                .check(Expr::col(ProductSuppliers::DeliveryDays).gte(0)),
        )
        .col(
            ColumnDef::new(ProductSuppliers::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(ProductSuppliers::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_product_suppliers_product")
                .from(ProductSuppliers::Table, ProductSuppliers::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_product_suppliers_supplier")
                .from(ProductSuppliers::Table, ProductSuppliers::SupplierId)
                .to(Suppliers::Table, Suppliers::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn tags() -> TableCreateStatement {
    Table::create()
        .table(Tags::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Tags::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Tags::Name)
                .string_len(50)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Tags::Description).text())
        .col(
            ColumnDef::new(Tags::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Tags::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .to_owned()
}

fn product_tags() -> TableCreateStatement {
    Table::create()
        .table(ProductTags::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(ProductTags::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(ProductTags::ProductId).integer().not_null())
        .col(ColumnDef::new(ProductTags::TagId).integer().not_null())
        .foreign_key(
            ForeignKey::create()
                .name("fk_product_tags_product")
                .from(ProductTags::Table, ProductTags::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_product_tags_tag")
                .from(ProductTags::Table, ProductTags::TagId)
                .to(Tags::Table, Tags::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

fn customers() -> TableCreateStatement {
    Table::create()
        .table(Customers::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Customers::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Customers::FirstName).string_len(100).not_null())
        .col(ColumnDef::new(Customers::LastName).string_len(100).not_null())
        .col(
            ColumnDef::new(Customers::Email)
                .string_len(254)
                .not_null()
                .unique_key(),
        )
        .col(ColumnDef::new(Customers::Phone).string_len(20))
        .col(
            ColumnDef::new(Customers::RegistrationDate)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(ColumnDef::new(Customers::CreatedBy).integer())
        .col(
            ColumnDef::new(Customers::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Customers::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Customers::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_customers_created_by")
                .from(Customers::Table, Customers::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn orders() -> TableCreateStatement {
    Table::create()
        .table(Orders::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Orders::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Orders::CustomerId).integer().not_null())
        .col(
            ColumnDef::new(Orders::OrderDate)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Orders::TotalAmount)
                .decimal_len(10, 2)
                .not_null()
                .check(Expr::col(Orders::TotalAmount).gte(0)),
        )
        .col(
            ColumnDef::new(Orders::Status)
                .string_len(20)
                .not_null()
                .default(OrderStatus::Pending.as_str())
                .check(
                    Expr::col(Orders::Status)
                        .is_in(OrderStatus::ALL.iter().map(|status| status.as_str())),
                ),
        )
        .col(ColumnDef::new(Orders::CreatedBy).integer())
        .col(
            ColumnDef::new(Orders::IsActive)
                .boolean()
                .not_null()
                .default(true),
        )
        .col(
            ColumnDef::new(Orders::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Orders::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_orders_customer")
                .from(Orders::Table, Orders::CustomerId)
                .to(Customers::Table, Customers::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_orders_created_by")
                .from(Orders::Table, Orders::CreatedBy)
                .to(Users::Table, Users::Id)
                .on_delete(ForeignKeyAction::SetNull),
        )
        .to_owned()
}

fn order_items() -> TableCreateStatement {
    Table::create()
        .table(OrderItems::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(OrderItems::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(OrderItems::OrderId).integer().not_null())
        .col(ColumnDef::new(OrderItems::ProductId).integer().not_null())
        .col(
            ColumnDef::new(OrderItems::Quantity)
                .integer()
                .not_null()
                .check(Expr::col(OrderItems::Quantity).gte(1)),
        )
        .col(
            ColumnDef::new(OrderItems::UnitPrice)
                .decimal_len(10, 2)
                .not_null()
                .check(Expr::col(OrderItems::UnitPrice).gte(0)),
        )
        .col(
            ColumnDef::new(OrderItems::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(OrderItems::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_order_items_order")
                .from(OrderItems::Table, OrderItems::OrderId)
                .to(Orders::Table, Orders::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_order_items_product")
                .from(OrderItems::Table, OrderItems::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Restrict),
        )
        .to_owned()
}

fn reviews() -> TableCreateStatement {
    Table::create()
        .table(Reviews::Table)
        .if_not_exists()
        .col(
            ColumnDef::new(Reviews::Id)
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(ColumnDef::new(Reviews::ProductId).integer().not_null())
        .col(ColumnDef::new(Reviews::CustomerId).integer().not_null())
        .col(
            ColumnDef::new(Reviews::Rating)
                .integer()
                .not_null()
                .check(Expr::col(Reviews::Rating).between(1, 5)),
        )
        .col(ColumnDef::new(Reviews::Comment).text())
        .col(
            ColumnDef::new(Reviews::CreatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .col(
            ColumnDef::new(Reviews::UpdatedAt)
                .date_time()
                .not_null()
                .default(now_default()),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_reviews_product")
                .from(Reviews::Table, Reviews::ProductId)
                .to(Products::Table, Products::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .foreign_key(
            ForeignKey::create()
                .name("fk_reviews_customer")
                .from(Reviews::Table, Reviews::CustomerId)
                .to(Customers::Table, Customers::Id)
                .on_delete(ForeignKeyAction::Cascade),
        )
        .to_owned()
}

/// Tables in foreign-key dependency order.
fn tables() -> Vec<TableCreateStatement> {
    vec![
        users(),
        suppliers(),
        categories(),
        products(),
        product_details(),
        product_suppliers(),
        tags(),
        product_tags(),
        customers(),
        orders(),
        order_items(),
        reviews(),
    ]
}

fn indexes() -> Vec<IndexCreateStatement> {
    let composite_uniques = vec![
        Index::create()
            .name("uq_products_name_category")
            .table(Products::Table)
            .col(Products::Name)
            .col(Products::CategoryId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_product_suppliers_pair")
            .table(ProductSuppliers::Table)
            .col(ProductSuppliers::ProductId)
            .col(ProductSuppliers::SupplierId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_product_tags_pair")
            .table(ProductTags::Table)
            .col(ProductTags::ProductId)
            .col(ProductTags::TagId)
            .unique()
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("uq_order_items_order_product")
            .table(OrderItems::Table)
            .col(OrderItems::OrderId)
            .col(OrderItems::ProductId)
            .unique()
            .if_not_exists()
            .to_owned(),
    ];

    let lookups = vec![
        Index::create()
            .name("idx_categories_main_supplier_id")
            .table(Categories::Table)
            .col(Categories::MainSupplierId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_categories_created_by")
            .table(Categories::Table)
            .col(Categories::CreatedBy)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_categories_is_active")
            .table(Categories::Table)
            .col(Categories::IsActive)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_suppliers_created_by")
            .table(Suppliers::Table)
            .col(Suppliers::CreatedBy)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_suppliers_is_active")
            .table(Suppliers::Table)
            .col(Suppliers::IsActive)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_name")
            .table(Products::Table)
            .col(Products::Name)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_price")
            .table(Products::Table)
            .col(Products::Price)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_stock_quantity")
            .table(Products::Table)
            .col(Products::StockQuantity)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_category_id")
            .table(Products::Table)
            .col(Products::CategoryId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_created_by")
            .table(Products::Table)
            .col(Products::CreatedBy)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_products_is_active")
            .table(Products::Table)
            .col(Products::IsActive)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_product_suppliers_supplier_product")
            .table(ProductSuppliers::Table)
            .col(ProductSuppliers::SupplierId)
            .col(ProductSuppliers::ProductId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_product_tags_tag_id")
            .table(ProductTags::Table)
            .col(ProductTags::TagId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_customers_last_first")
            .table(Customers::Table)
            .col(Customers::LastName)
            .col(Customers::FirstName)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_customers_registration_date")
            .table(Customers::Table)
            .col(Customers::RegistrationDate)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_customers_created_by")
            .table(Customers::Table)
            .col(Customers::CreatedBy)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_customers_is_active")
            .table(Customers::Table)
            .col(Customers::IsActive)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_orders_status_order_date")
            .table(Orders::Table)
            .col(Orders::Status)
            .col(Orders::OrderDate)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_orders_customer_order_date")
            .table(Orders::Table)
            .col(Orders::CustomerId)
            .col(Orders::OrderDate)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_orders_created_by")
            .table(Orders::Table)
            .col(Orders::CreatedBy)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_orders_is_active")
            .table(Orders::Table)
            .col(Orders::IsActive)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_order_items_order_id")
            .table(OrderItems::Table)
            .col(OrderItems::OrderId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_order_items_product_id")
            .table(OrderItems::Table)
            .col(OrderItems::ProductId)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_reviews_product_rating")
            .table(Reviews::Table)
            .col(Reviews::ProductId)
            .col(Reviews::Rating)
            .if_not_exists()
            .to_owned(),
        Index::create()
            .name("idx_reviews_customer_id")
            .table(Reviews::Table)
            .col(Reviews::CustomerId)
            .if_not_exists()
            .to_owned(),
    ];

    composite_uniques.into_iter().chain(lookups).collect()
}

/// Tables whose `updated_at` is refreshed by trigger.
const TOUCHED_TABLES: [&str; 10] = [
    "categories",
    "suppliers",
    "products",
    "product_details",
    "product_suppliers",
    "tags",
    "customers",
    "orders",
    "order_items",
    "reviews",
];

// The WHEN guard skips updates that already set updated_at themselves, so
// crate-level updates do not write the column twice.
fn touch_trigger(table: &str) -> String {
    format!(
        "CREATE TRIGGER IF NOT EXISTS trg_{table}_touch_updated_at \
         AFTER UPDATE ON {table} \
         FOR EACH ROW WHEN NEW.updated_at = OLD.updated_at \
         BEGIN \
         UPDATE {table} SET updated_at = {NOW_EXPR} WHERE id = NEW.id; \
         END"
    )
}

fn triggers() -> Vec<String> {
    TOUCHED_TABLES.iter().map(|table| touch_trigger(table)).collect()
}

/// Render every schema statement in execution order.
pub fn ddl() -> Vec<String> {
    let mut statements: Vec<String> = tables()
        .iter()
        .map(|table| table.build(SqliteQueryBuilder))
        .collect();
    statements.extend(indexes().iter().map(|index| index.build(SqliteQueryBuilder)));
    statements.extend(triggers());
    statements
}

/// Create every table, index, and trigger. Idempotent.
///
/// # Errors
///
/// Returns a [`StoreError`] if any statement fails.
pub fn create_all(exec: &dyn StoreExecutor) -> Result<(), StoreError> {
    for statement in ddl() {
        exec.execute_batch(&statement)?;
    }
    log::info!("schema ready: {} tables", TABLE_NAMES.len());
    Ok(())
}

/// Drop every table (triggers and indexes go with them). Idempotent.
///
/// # Errors
///
/// Returns a [`StoreError`] if any drop fails.
pub fn drop_all(exec: &dyn StoreExecutor) -> Result<(), StoreError> {
    for table in TABLE_NAMES.iter().rev() {
        let statement = Table::drop()
            .table(sea_query::Alias::new(*table))
            .if_exists()
            .to_owned()
            .build(SqliteQueryBuilder);
        exec.execute_batch(&statement)?;
    }
    Ok(())
}

/// Every table, in creation order.
pub const TABLE_NAMES: [&str; 12] = [
    "users",
    "suppliers",
    "categories",
    "products",
    "product_details",
    "product_suppliers",
    "tags",
    "product_tags",
    "customers",
    "orders",
    "order_items",
    "reviews",
];

#[cfg(test)]
mod tests {
    use super::*;

    fn full_ddl() -> String {
        ddl().join(";\n")
    }

    #[test]
    fn renders_every_table() {
        let sql = full_ddl();
        for table in TABLE_NAMES {
            assert!(
                sql.contains(&format!("CREATE TABLE IF NOT EXISTS \"{table}\"")),
                "missing table {table}"
            );
        }
    }

    #[test]
    fn deletion_policies_are_declared() {
        let sql = full_ddl();
        assert!(sql.contains("ON DELETE RESTRICT"));
        assert!(sql.contains("ON DELETE CASCADE"));
        assert!(sql.contains("ON DELETE SET NULL"));
    }

    #[test]
    fn numeric_guards_are_declared() {
        let sql = full_ddl();
        assert!(sql.contains("CHECK"));
        assert!(sql.contains("\"rating\""));
        assert!(sql.contains("\"quantity\""));
        assert!(sql.contains("'pending'"));
    }

    #[test]
    fn composite_uniques_are_declared() {
        let sql = full_ddl();
        assert!(sql.contains("uq_products_name_category"));
        assert!(sql.contains("uq_order_items_order_product"));
        assert!(sql.contains("CREATE UNIQUE INDEX"));
    }

    #[test]
    fn touch_triggers_cover_timestamped_tables() {
        let sql = full_ddl();
        for table in TOUCHED_TABLES {
            assert!(sql.contains(&format!("trg_{table}_touch_updated_at")));
        }
        // Bare join table and the account table stay untouched.
        assert!(!sql.contains("trg_product_tags_touch_updated_at"));
        assert!(!sql.contains("trg_users_touch_updated_at"));
    }
}
