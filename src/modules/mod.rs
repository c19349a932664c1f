pub mod books;

use std::sync::Arc;

use shelf_db::Database;
use shelf_kernel::ModuleRegistry;

use books::store::SqliteBookStore;

/// Register all project-specific modules with the registry
pub fn register_all(registry: &mut ModuleRegistry, database: &Database) {
    let store = SqliteBookStore::new(database.pool().clone());
    registry.register_custom(books::create_module(Arc::new(store)));
}
