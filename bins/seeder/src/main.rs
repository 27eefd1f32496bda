//! Database seeder for Lyceum development and testing.
//!
//! Seeds demo users, course categories, courses with lesson sequences,
//! stock recommendations, and news articles for local development.
//!
//! Usage: cargo run --bin seeder

use chrono::{Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, Set};
use uuid::Uuid;

use lyceum_db::entities::{
    course_categories, courses, lessons, news_articles,
    sea_orm_active_enums::{
        CourseLevel, LessonContent, RiskLevel, StockAction, SubscriptionTier,
    },
    stock_recommendations, users,
};

/// Demo student ID (consistent for all seeds)
const DEMO_STUDENT_ID: &str = "00000000-0000-0000-0000-000000000001";
/// Demo premium user ID (consistent for all seeds)
const DEMO_PREMIUM_ID: &str = "00000000-0000-0000-0000-000000000002";
/// Investing category ID (consistent for all seeds)
const CATEGORY_INVESTING_ID: &str = "00000000-0000-0000-0000-000000000010";
/// Free course ID (consistent for all seeds)
const COURSE_FREE_ID: &str = "00000000-0000-0000-0000-000000000020";
/// Paid course ID (consistent for all seeds)
const COURSE_PAID_ID: &str = "00000000-0000-0000-0000-000000000021";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let database_url =
        std::env::var("DATABASE_URL").expect("DATABASE_URL must be set in environment");

    println!("Connecting to database...");
    let db = lyceum_db::connect(&database_url)
        .await
        .expect("Failed to connect to database");

    println!("Seeding demo users...");
    seed_users(&db).await;

    println!("Seeding categories...");
    seed_categories(&db).await;

    println!("Seeding courses and lessons...");
    seed_courses(&db).await;

    println!("Seeding stock recommendations...");
    seed_recommendations(&db).await;

    println!("Seeding news articles...");
    seed_news(&db).await;

    println!("Seeding complete!");
}

fn fixed_id(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("seed UUID is valid")
}

/// Seeds a free-tier student and a premium member.
async fn seed_users(db: &DatabaseConnection) {
    let seeds = [
        (
            DEMO_STUDENT_ID,
            "student",
            "Demo Student",
            SubscriptionTier::Free,
            dec!(75.00),
        ),
        (
            DEMO_PREMIUM_ID,
            "premium",
            "Demo Premium",
            SubscriptionTier::Premium,
            Decimal::ZERO,
        ),
    ];

    for (id, username, full_name, tier, balance) in seeds {
        let id = fixed_id(id);
        if users::Entity::find_by_id(id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  User {username} already exists, skipping...");
            continue;
        }

        let user = users::ActiveModel {
            id: Set(id),
            username: Set(username.to_string()),
            password_hash: Set("$argon2id$v=19$m=65536,t=3,p=4$demo_hash".to_string()),
            full_name: Set(full_name.to_string()),
            subscription_tier: Set(tier),
            credit_balance: Set(balance),
            referral_code: Set(username.to_string()),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = user.insert(db).await {
            eprintln!("Failed to insert user {username}: {e}");
        } else {
            println!("  Created user: {username}");
        }
    }
}

/// Seeds the course categories.
async fn seed_categories(db: &DatabaseConnection) {
    let id = fixed_id(CATEGORY_INVESTING_ID);
    if course_categories::Entity::find_by_id(id)
        .one(db)
        .await
        .ok()
        .flatten()
        .is_some()
    {
        println!("  Categories already exist, skipping...");
        return;
    }

    let category = course_categories::ActiveModel {
        id: Set(id),
        name: Set("Investing".to_string()),
        description: Set(Some("Stock market and portfolio basics".to_string())),
        icon: Set("📈".to_string()),
    };

    if let Err(e) = category.insert(db).await {
        eprintln!("Failed to insert category: {e}");
    } else {
        println!("  Created category: Investing");
    }
}

/// Seeds a free and a paid course, each with an ordered lesson sequence.
async fn seed_courses(db: &DatabaseConnection) {
    let category_id = fixed_id(CATEGORY_INVESTING_ID);
    let seeds = [
        (
            COURSE_FREE_ID,
            "Stock Market Foundations",
            "What a share is, how exchanges work, and how to read a quote.",
            CourseLevel::Beginner,
            Decimal::ZERO,
        ),
        (
            COURSE_PAID_ID,
            "Building a Dividend Portfolio",
            "Screening, valuing, and laddering dividend payers.",
            CourseLevel::Intermediate,
            dec!(30.00),
        ),
    ];

    for (id, title, description, level, price) in seeds {
        let course_id = fixed_id(id);
        if courses::Entity::find_by_id(course_id)
            .one(db)
            .await
            .ok()
            .flatten()
            .is_some()
        {
            println!("  Course '{title}' already exists, skipping...");
            continue;
        }

        let course = courses::ActiveModel {
            id: Set(course_id),
            title: Set(title.to_string()),
            description: Set(description.to_string()),
            instructor: Set(Some("Dana Rivers".to_string())),
            category_id: Set(Some(category_id)),
            level: Set(level),
            price: Set(price),
            duration_hours: Set(Some(4)),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
            updated_at: Set(Utc::now().into()),
        };

        if let Err(e) = course.insert(db).await {
            eprintln!("Failed to insert course '{title}': {e}");
            continue;
        }
        println!("  Created course: {title}");

        for (order, lesson_title) in [
            "Welcome and overview",
            "Core concepts",
            "Worked examples",
            "Putting it together",
        ]
        .into_iter()
        .enumerate()
        {
            #[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
            let order = order as i32 + 1;
            let lesson = lessons::ActiveModel {
                id: Set(Uuid::new_v4()),
                course_id: Set(course_id),
                title: Set(lesson_title.to_string()),
                content_type: Set(LessonContent::Video),
                description: Set(None),
                video_url: Set(Some(format!(
                    "https://videos.lyceum.dev/{id}/lesson-{order}.mp4"
                ))),
                text_content: Set(None),
                duration_minutes: Set(15),
                order: Set(order),
                is_preview: Set(order == 1),
                created_at: Set(Utc::now().into()),
            };

            if let Err(e) = lesson.insert(db).await {
                eprintln!("Failed to insert lesson {order}: {e}");
            }
        }
    }
}

/// Seeds sample stock recommendations.
async fn seed_recommendations(db: &DatabaseConnection) {
    let existing = stock_recommendations::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  Recommendations already exist, skipping...");
        return;
    }

    let seeds = [
        ("ACME", "Acme Corp", StockAction::Buy, dec!(182.00), dec!(154.30), RiskLevel::Medium),
        ("GLBX", "Globex Industries", StockAction::Hold, dec!(96.00), dec!(93.10), RiskLevel::Low),
        ("INTR", "Initech Robotics", StockAction::Sell, dec!(41.00), dec!(55.75), RiskLevel::High),
    ];

    for (symbol, company, action, target, current, risk) in seeds {
        let rec = stock_recommendations::ActiveModel {
            id: Set(Uuid::new_v4()),
            stock_symbol: Set(symbol.to_string()),
            company_name: Set(company.to_string()),
            action: Set(action),
            target_price: Set(target),
            current_price: Set(current),
            analysis: Set(format!("Quarterly outlook for {company}.")),
            risk_level: Set(risk),
            published_date: Set(Utc::now().into()),
            expiry_date: Set((Utc::now() + Duration::days(30)).into()),
            is_active: Set(true),
        };

        if let Err(e) = rec.insert(db).await {
            eprintln!("Failed to insert recommendation {symbol}: {e}");
        } else {
            println!("  Created recommendation: {symbol}");
        }
    }
}

/// Seeds sample news articles.
async fn seed_news(db: &DatabaseConnection) {
    let existing = news_articles::Entity::find().one(db).await.ok().flatten();
    if existing.is_some() {
        println!("  News articles already exist, skipping...");
        return;
    }

    for (days_ago, title) in [
        (0, "Markets rally on rate-cut hopes"),
        (1, "Tech earnings beat expectations"),
        (2, "Commodities cool after a volatile week"),
    ] {
        let article = news_articles::ActiveModel {
            id: Set(Uuid::new_v4()),
            title: Set(title.to_string()),
            content: Set(format!("{title}. Full analysis inside.")),
            summary: Set(Some(title.to_string())),
            source: Set("Lyceum Desk".to_string()),
            published_date: Set((Utc::now() - Duration::days(days_ago)).into()),
            image_url: Set(None),
            tags: Set(Some("markets".to_string())),
            is_active: Set(true),
            created_at: Set(Utc::now().into()),
        };

        if let Err(e) = article.insert(db).await {
            eprintln!("Failed to insert article '{title}': {e}");
        } else {
            println!("  Created article: {title}");
        }
    }
}
