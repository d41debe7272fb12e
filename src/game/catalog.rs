//! Animals that can turn up at a MARKET space.

use once_cell::sync::Lazy;

use crate::game::types::Animal;

const ANIMALS: &[(&str, i64, u32)] = &[
    ("Rabbit", 100, 1),
    ("Goat", 150, 1),
    ("Flamingo", 200, 1),
    ("Penguin", 250, 2),
    ("Zebra", 300, 2),
    ("Kangaroo", 350, 2),
    ("Giraffe", 450, 3),
    ("Lion", 500, 3),
    ("Elephant", 600, 3),
    ("Panda", 750, 4),
];

static CATALOG: Lazy<Vec<Animal>> = Lazy::new(|| {
    ANIMALS
        .iter()
        .map(|(name, cost, tier)| Animal {
            name: (*name).to_string(),
            cost: *cost,
            tier: *tier,
        })
        .collect()
});

/// Full catalog, never empty.
pub fn catalog() -> &'static [Animal] {
    &CATALOG
}

/// Look up a catalog entry by name.
pub fn find(name: &str) -> Option<&'static Animal> {
    CATALOG.iter().find(|a| a.name.eq_ignore_ascii_case(name))
}
