//! Static catalogs: shop items, quizzes and achievements.
//!
//! These tables are fixed at compile time and never mutated at runtime.

use serde::Serialize;

/// Shop tab an item is listed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ShopCategory {
    /// Companion pets
    Pets,
    /// Things a pet can wear or carry
    Accessories,
}

impl ShopCategory {
    /// Get string representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            ShopCategory::Pets => "pets",
            ShopCategory::Accessories => "accessories",
        }
    }
}

impl std::str::FromStr for ShopCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pets" => Ok(ShopCategory::Pets),
            "accessories" => Ok(ShopCategory::Accessories),
            other => Err(format!("unknown shop category: {other}")),
        }
    }
}

/// An item that can be bought with points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ShopItem {
    /// Unique identifier
    pub id: &'static str,

    /// Display name
    pub name: &'static str,

    /// Icon shown next to the name
    pub emoji: &'static str,

    /// Price in points, always positive
    pub price: u32,

    /// Shop tab
    pub category: ShopCategory,
}

const fn item(
    id: &'static str,
    name: &'static str,
    emoji: &'static str,
    price: u32,
    category: ShopCategory,
) -> ShopItem {
    ShopItem { id, name, emoji, price, category }
}

/// Everything the shop sells, pets first.
pub const SHOP_ITEMS: &[ShopItem] = &[
    item("pet1", "Cat", "🐱", 25, ShopCategory::Pets),
    item("pet2", "Dog", "🐶", 25, ShopCategory::Pets),
    item("pet3", "Rabbit", "🐰", 20, ShopCategory::Pets),
    item("pet4", "Fox", "🦊", 30, ShopCategory::Pets),
    item("pet5", "Panda", "🐼", 30, ShopCategory::Pets),
    item("pet6", "Lion", "🦁", 30, ShopCategory::Pets),
    item("pet7", "Tiger", "🐯", 30, ShopCategory::Pets),
    item("pet8", "Frog", "🐸", 15, ShopCategory::Pets),
    item("acc1", "Crown", "👑", 20, ShopCategory::Accessories),
    item("acc2", "Top Hat", "🎩", 15, ShopCategory::Accessories),
    item("acc3", "Bow", "🎀", 10, ShopCategory::Accessories),
    item("acc4", "Glasses", "👓", 12, ShopCategory::Accessories),
    item("acc5", "Mask", "🎭", 18, ShopCategory::Accessories),
    item("acc6", "Scarf", "🧣", 15, ShopCategory::Accessories),
    item("acc7", "Star Badge", "⭐", 8, ShopCategory::Accessories),
    item("acc8", "Flower", "🌸", 10, ShopCategory::Accessories),
    item("acc9", "Backpack", "🎒", 20, ShopCategory::Accessories),
    item("acc10", "Bone", "🦴", 5, ShopCategory::Accessories),
];

/// Items listed under one shop tab, in catalog order.
pub fn shop_items_in(category: ShopCategory) -> impl Iterator<Item = &'static ShopItem> {
    SHOP_ITEMS.iter().filter(move |item| item.category == category)
}

/// Look up a shop item by id.
pub fn find_shop_item(id: &str) -> Option<&'static ShopItem> {
    SHOP_ITEMS.iter().find(|item| item.id == id)
}

/// One multiple-choice question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct QuizSlide {
    /// Question text
    pub question: &'static str,

    /// Answer options, in display order
    pub options: &'static [&'static str],

    /// Index into `options` of the right answer
    pub correct: usize,
}

/// A short lesson that awards points the first time it is finished.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Quiz {
    /// Unique identifier
    pub id: &'static str,

    /// Display title
    pub title: &'static str,

    /// Points awarded on first completion
    pub points: u32,

    /// Questions, in order
    pub slides: &'static [QuizSlide],
}

/// All quizzes on the learning page.
pub const QUIZZES: &[Quiz] = &[
    Quiz {
        id: "cycling-lanes",
        title: "How to use cycling lanes",
        points: 10,
        slides: &[
            QuizSlide {
                question: "What side of the road should you cycle on?",
                options: &["Right side", "Left side", "Middle", "Any side"],
                correct: 0,
            },
            QuizSlide {
                question: "What should you do before turning?",
                options: &["Speed up", "Signal with your hand", "Close your eyes", "Nothing"],
                correct: 1,
            },
            QuizSlide {
                question: "When should you use bike lanes?",
                options: &["Never", "Only at night", "Whenever available", "Only when raining"],
                correct: 2,
            },
        ],
    },
    Quiz {
        id: "air-pollution",
        title: "Air pollution",
        points: 10,
        slides: &[
            QuizSlide {
                question: "Which mode of transport produces the least air pollution?",
                options: &["Car", "Bus", "Walking/Cycling", "Motorcycle"],
                correct: 2,
            },
            QuizSlide {
                question: "What is a main cause of urban air pollution?",
                options: &["Trees", "Vehicle emissions", "Rain", "Wind"],
                correct: 1,
            },
            QuizSlide {
                question: "How can you help reduce air pollution?",
                options: &[
                    "Drive more",
                    "Walk or cycle instead",
                    "Use more plastic",
                    "Leave lights on",
                ],
                correct: 1,
            },
        ],
    },
];

/// Look up a quiz by id.
pub fn find_quiz(id: &str) -> Option<&'static Quiz> {
    QUIZZES.iter().find(|quiz| quiz.id == id)
}

/// A badge unlocked by arriving at school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Achievement {
    /// Icon
    pub icon: &'static str,

    /// Title
    pub title: &'static str,

    /// One-line description
    pub subtitle: &'static str,
}

/// Achievements, indexed by the arrival that unlocks them (index 0 = first arrival).
pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        icon: "🏆",
        title: "First Steps",
        subtitle: "Complete your first route",
    },
    Achievement {
        icon: "⭐",
        title: "Week Warrior",
        subtitle: "Walk 5 days in a row",
    },
    Achievement {
        icon: "🎖️",
        title: "Distance Master",
        subtitle: "Walk 10km total",
    },
];
