//! Initial database migration.
//!
//! Creates all enums, tables, constraints, and indexes. The uniqueness
//! constraints here are load-bearing: `(user_id, course_id)` on enrollments
//! and `referred_user_id` on referrals are the serialization points for
//! concurrent enroll and referral application.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        // ============================================================
        // PART 1: ENUMS
        // ============================================================
        db.execute_unprepared(ENUMS_SQL).await?;

        // ============================================================
        // PART 2: IDENTITY
        // ============================================================
        db.execute_unprepared(USERS_SQL).await?;

        // ============================================================
        // PART 3: CATALOG
        // ============================================================
        db.execute_unprepared(COURSE_CATEGORIES_SQL).await?;
        db.execute_unprepared(COURSES_SQL).await?;
        db.execute_unprepared(LESSONS_SQL).await?;

        // ============================================================
        // PART 4: ENROLLMENT & REFERRAL LEDGERS
        // ============================================================
        db.execute_unprepared(ENROLLMENTS_SQL).await?;
        db.execute_unprepared(REFERRALS_SQL).await?;

        // ============================================================
        // PART 5: PREMIUM CONTENT
        // ============================================================
        db.execute_unprepared(STOCK_RECOMMENDATIONS_SQL).await?;
        db.execute_unprepared(NEWS_ARTICLES_SQL).await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared(DROP_ALL_SQL).await?;
        Ok(())
    }
}

// ============================================================
// SQL CONSTANTS
// ============================================================

const ENUMS_SQL: &str = r"
-- Subscription tiers
CREATE TYPE subscription_tier AS ENUM ('free', 'premium');

-- Course difficulty levels
CREATE TYPE course_level AS ENUM ('beginner', 'intermediate', 'advanced');

-- Lesson content types
CREATE TYPE lesson_content AS ENUM ('video', 'image', 'pdf', 'text', 'quiz');

-- Stock recommendation actions
CREATE TYPE stock_action AS ENUM ('buy', 'hold', 'sell');

-- Stock recommendation risk levels
CREATE TYPE risk_level AS ENUM ('low', 'medium', 'high');
";

const USERS_SQL: &str = r"
CREATE TABLE users (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    username VARCHAR(150) NOT NULL UNIQUE,
    password_hash VARCHAR(255) NOT NULL,
    full_name VARCHAR(255) NOT NULL,
    subscription_tier subscription_tier NOT NULL DEFAULT 'free',
    credit_balance NUMERIC(10, 2) NOT NULL DEFAULT 0,
    referral_code VARCHAR(100) NOT NULL UNIQUE,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_credit_balance_non_negative CHECK (credit_balance >= 0)
);

CREATE INDEX idx_users_username ON users(username) WHERE is_active = true;
CREATE INDEX idx_users_referral_code ON users(referral_code);
";

const COURSE_CATEGORIES_SQL: &str = r"
CREATE TABLE course_categories (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    name VARCHAR(100) NOT NULL,
    description TEXT,
    icon VARCHAR(50) NOT NULL DEFAULT ''
);
";

const COURSES_SQL: &str = r"
CREATE TABLE courses (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(200) NOT NULL,
    description TEXT NOT NULL,
    instructor VARCHAR(200),
    category_id UUID REFERENCES course_categories(id) ON DELETE SET NULL,
    level course_level NOT NULL,
    price NUMERIC(10, 2) NOT NULL,
    duration_hours INTEGER,
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_price_non_negative CHECK (price >= 0)
);

CREATE INDEX idx_courses_active ON courses(created_at DESC) WHERE is_active = true;
CREATE INDEX idx_courses_category ON courses(category_id);
";

const LESSONS_SQL: &str = r#"
CREATE TABLE lessons (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    -- Course deletion cascades to its lessons: explicit policy, not
    -- framework-implied.
    course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    title VARCHAR(200) NOT NULL,
    content_type lesson_content NOT NULL DEFAULT 'video',
    description TEXT,
    video_url TEXT,
    text_content TEXT,
    duration_minutes INTEGER NOT NULL DEFAULT 0,
    -- Sequence rank. NOT unique within a course; rank computation
    -- tie-breaks by id.
    "order" INTEGER NOT NULL,
    is_preview BOOLEAN NOT NULL DEFAULT false,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_order_non_negative CHECK ("order" >= 0)
);

CREATE INDEX idx_lessons_course_order ON lessons(course_id, "order", id);
"#;

const ENROLLMENTS_SQL: &str = r"
CREATE TABLE enrollments (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    user_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    course_id UUID NOT NULL REFERENCES courses(id) ON DELETE CASCADE,
    progress NUMERIC(5, 2) NOT NULL DEFAULT 0,
    completed BOOLEAN NOT NULL DEFAULT false,
    enrolled_at TIMESTAMPTZ NOT NULL DEFAULT now(),
    updated_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_progress_range CHECK (progress >= 0 AND progress <= 100),
    UNIQUE (user_id, course_id)
);

CREATE INDEX idx_enrollments_user ON enrollments(user_id, completed);
";

const REFERRALS_SQL: &str = r"
CREATE TABLE referrals (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    referrer_id UUID NOT NULL REFERENCES users(id) ON DELETE CASCADE,
    referred_user_id UUID NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
    credit_amount NUMERIC(10, 2) NOT NULL,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now(),

    CONSTRAINT chk_credit_amount_positive CHECK (credit_amount > 0),
    CONSTRAINT chk_no_self_referral CHECK (referrer_id <> referred_user_id)
);

CREATE INDEX idx_referrals_referrer ON referrals(referrer_id);
";

const STOCK_RECOMMENDATIONS_SQL: &str = r"
CREATE TABLE stock_recommendations (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    stock_symbol VARCHAR(10) NOT NULL,
    company_name VARCHAR(200) NOT NULL,
    action stock_action NOT NULL,
    target_price NUMERIC(10, 2) NOT NULL,
    current_price NUMERIC(10, 2) NOT NULL,
    analysis TEXT NOT NULL,
    risk_level risk_level NOT NULL,
    published_date TIMESTAMPTZ NOT NULL DEFAULT now(),
    expiry_date TIMESTAMPTZ NOT NULL,
    is_active BOOLEAN NOT NULL DEFAULT true
);

CREATE INDEX idx_recommendations_published ON stock_recommendations(published_date DESC)
    WHERE is_active = true;
";

const NEWS_ARTICLES_SQL: &str = r"
CREATE TABLE news_articles (
    id UUID PRIMARY KEY DEFAULT gen_random_uuid(),
    title VARCHAR(300) NOT NULL,
    content TEXT NOT NULL,
    summary TEXT,
    source VARCHAR(100) NOT NULL,
    published_date TIMESTAMPTZ NOT NULL,
    image_url TEXT,
    tags VARCHAR(200),
    is_active BOOLEAN NOT NULL DEFAULT true,
    created_at TIMESTAMPTZ NOT NULL DEFAULT now()
);

CREATE INDEX idx_news_published ON news_articles(published_date DESC) WHERE is_active = true;
";

const DROP_ALL_SQL: &str = r"
DROP TABLE IF EXISTS news_articles;
DROP TABLE IF EXISTS stock_recommendations;
DROP TABLE IF EXISTS referrals;
DROP TABLE IF EXISTS enrollments;
DROP TABLE IF EXISTS lessons;
DROP TABLE IF EXISTS courses;
DROP TABLE IF EXISTS course_categories;
DROP TABLE IF EXISTS users;

DROP TYPE IF EXISTS risk_level;
DROP TYPE IF EXISTS stock_action;
DROP TYPE IF EXISTS lesson_content;
DROP TYPE IF EXISTS course_level;
DROP TYPE IF EXISTS subscription_tier;
";
