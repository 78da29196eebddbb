//! The full set of collections the engine operates over.

use std::sync::Arc;

use branchline_auth::{Role, RolePermissionBinding};
use branchline_catalog::{
    BranchSalesMethod, Category, Ingredient, IngredientCategory, Kitchen, Menu, MenuBranch,
    Product, ProductIngredient, ProductKitchen, ProductPrice, Table,
};
use branchline_tenancy::{Branch, Company, Membership, UserRecord};

use crate::permission_catalog::PermissionCatalog;
use crate::store::{Collection, MemCollection};

/// Every collection the cascade walks, plus the permission catalog.
///
/// Held behind `Arc`s so tests can substitute individual collections (for
/// example, a fault-injecting one) without rebuilding the rest.
#[derive(Clone)]
pub struct Stores {
    pub companies: Arc<dyn Collection<Company>>,
    pub branches: Arc<dyn Collection<Branch>>,
    pub users: Arc<dyn Collection<UserRecord>>,
    pub memberships: Arc<dyn Collection<Membership>>,

    pub categories: Arc<dyn Collection<Category>>,
    pub products: Arc<dyn Collection<Product>>,
    pub ingredients: Arc<dyn Collection<Ingredient>>,
    pub ingredient_categories: Arc<dyn Collection<IngredientCategory>>,
    pub menus: Arc<dyn Collection<Menu>>,
    pub kitchens: Arc<dyn Collection<Kitchen>>,
    pub product_prices: Arc<dyn Collection<ProductPrice>>,
    pub product_ingredients: Arc<dyn Collection<ProductIngredient>>,

    pub tables: Arc<dyn Collection<Table>>,
    pub branch_sales_methods: Arc<dyn Collection<BranchSalesMethod>>,
    pub product_kitchens: Arc<dyn Collection<ProductKitchen>>,
    pub menu_branches: Arc<dyn Collection<MenuBranch>>,

    pub roles: Arc<dyn Collection<Role>>,
    pub bindings: Arc<dyn Collection<RolePermissionBinding>>,
    pub permissions: Arc<PermissionCatalog>,
}

impl Stores {
    /// Fresh in-memory collections.
    pub fn in_memory() -> Self {
        Self {
            companies: Arc::new(MemCollection::new()),
            branches: Arc::new(MemCollection::new()),
            users: Arc::new(MemCollection::new()),
            memberships: Arc::new(MemCollection::new()),
            categories: Arc::new(MemCollection::new()),
            products: Arc::new(MemCollection::new()),
            ingredients: Arc::new(MemCollection::new()),
            ingredient_categories: Arc::new(MemCollection::new()),
            menus: Arc::new(MemCollection::new()),
            kitchens: Arc::new(MemCollection::new()),
            product_prices: Arc::new(MemCollection::new()),
            product_ingredients: Arc::new(MemCollection::new()),
            tables: Arc::new(MemCollection::new()),
            branch_sales_methods: Arc::new(MemCollection::new()),
            product_kitchens: Arc::new(MemCollection::new()),
            menu_branches: Arc::new(MemCollection::new()),
            roles: Arc::new(MemCollection::new()),
            bindings: Arc::new(MemCollection::new()),
            permissions: Arc::new(PermissionCatalog::new()),
        }
    }
}
