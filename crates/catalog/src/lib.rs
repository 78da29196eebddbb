//! `branchline-catalog` — dependent catalog record shapes.

pub mod records;

pub use records::{
    BranchSalesMethod, Category, Ingredient, IngredientCategory, Kitchen, Menu, MenuBranch,
    Product, ProductIngredient, ProductKitchen, ProductPrice, Table,
};
