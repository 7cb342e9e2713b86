use pgmigrate_core::MAX_FILE_NAME_LEN;
use sea_query::{
    Alias, ColumnDef, DeleteStatement, Expr, InsertStatement, Order, Query, SelectStatement,
    Table, TableCreateStatement,
};

pub const COL_ID: &str = "id";
pub const COL_FILE_NAME: &str = "file_name";
pub const COL_APPLIED_AT: &str = "applied_at";


pub fn create_table(table: &str) -> TableCreateStatement {
    Table::create()
        .table(Alias::new(table))
        .if_not_exists()
        .col(
            ColumnDef::new(Alias::new(COL_ID))
                .integer()
                .not_null()
                .auto_increment()
                .primary_key(),
        )
        .col(
            ColumnDef::new(Alias::new(COL_FILE_NAME))
                .string_len(MAX_FILE_NAME_LEN as u32)
                .not_null()
                .unique_key(),
        )
        .col(
            ColumnDef::new(Alias::new(COL_APPLIED_AT))
                .timestamp()
                .not_null()
                .default(Expr::current_timestamp()),
        )
        .to_owned()
}

pub fn select_all(table: &str) -> SelectStatement {
    Query::select()
        .columns([
            Alias::new(COL_ID),
            Alias::new(COL_FILE_NAME),
            Alias::new(COL_APPLIED_AT),
        ])
        .from(Alias::new(table))
        .order_by(Alias::new(COL_ID), Order::Asc)
        .to_owned()
}

pub fn select_by_name(table: &str, file_name: &str) -> SelectStatement {
    select_all(table)
        .and_where(Expr::col(Alias::new(COL_FILE_NAME)).eq(file_name))
        .to_owned()
}

pub fn insert(table: &str, file_name: &str) -> InsertStatement {
    Query::insert()
        .into_table(Alias::new(table))
        .columns([Alias::new(COL_FILE_NAME)])
        .values_panic([file_name.into()])
        .to_owned()
}

pub fn delete(table: &str, file_name: &str) -> DeleteStatement {
    Query::delete()
        .from_table(Alias::new(table))
        .and_where(Expr::col(Alias::new(COL_FILE_NAME)).eq(file_name))
        .to_owned()
}
