use super::*;
use crate::diagnostics::IssueKind;
use shared::models::UnitOfMeasure;


fn ingredient(id: &str, stock: i64, cost: Decimal) -> Ingredient {
    Ingredient {
        id: Some(id.to_string()),
        name: id.to_string(),
        unit: UnitOfMeasure::Gram,
        stock: Decimal::from(stock),
        cost,
        is_active: true,
    }
}

fn recipe(id: &str, price: i64) -> Recipe {
    Recipe {
        id: Some(id.to_string()),
        name: id.to_string(),
        price: Decimal::from(price),
        is_sub_recipe: false,
        is_available: true,
    }
}

fn edge(recipe: &str, ingredient: &str, quantity: i64) -> RecipeIngredient {
    RecipeIngredient {
        recipe: recipe.to_string(),
        ingredient: ingredient.to_string(),
        quantity: Decimal::from(quantity),
    }
}

fn sub_edge(parent: &str, child: &str, quantity: i64) -> RecipeSubRecipe {
    RecipeSubRecipe {
        parent: parent.to_string(),
        child: child.to_string(),
        quantity: Decimal::from(quantity),
    }
}

fn kitchen_item(id: &str, order: &str, recipe: &str, quantity: i32, group: Option<&str>) -> OrderItem {
    OrderItem {
        id: id.to_string(),
        order_id: order.to_string(),
        recipe: recipe.to_string(),
        quantity,
        status: OrderItemStatus::Pending,
        group_id: group.map(str::to_string),
        note: None,
        created_at: Utc::now(),
    }
}

/// Install a test subscriber once so RUST_LOG can surface engine logs
fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Cheese 100g on hand at 0.02/g; Burger = 50g cheese;
/// Double Burger = 2 × Burger
fn burger_engine() -> StockEngine {
    init_tracing();
    let engine = StockEngine::new();
    engine.load_catalog(
        vec![ingredient("ingredient:cheese", 100, Decimal::new(2, 2))],
        vec![recipe("recipe:burger", 8), recipe("recipe:double_burger", 14)],
        vec![edge("recipe:burger", "ingredient:cheese", 50)],
        vec![sub_edge("recipe:double_burger", "recipe:burger", 2)],
    );
    engine
}
