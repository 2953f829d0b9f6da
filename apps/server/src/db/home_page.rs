//! Home page content repository - a singleton row

use sqlx::PgPool;

use crate::{
    models::{HomePageContent, UpdateHomePageContentDto},
    Result,
};

#[derive(Clone)]
pub struct HomePageRepository {
    pool: PgPool,
}

impl HomePageRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_latest(&self) -> Result<Option<HomePageContent>> {
        let content = sqlx::query_as::<_, HomePageContent>(
            "SELECT * FROM home_page_content ORDER BY created_at DESC LIMIT 1",
        )
        .fetch_optional(&self.pool)
        .await?;
        Ok(content)
    }

    pub async fn insert(&self, dto: &UpdateHomePageContentDto) -> Result<HomePageContent> {
        let content = sqlx::query_as::<_, HomePageContent>(
            r#"
            INSERT INTO home_page_content (
                hero_title, hero_description, hero_button1, hero_button2,
                doctor_name, doctor_title, doctor_description,
                happy_patients, years_experience, specialist_doctors, positive_feedback,
                services_title, services_description, services,
                why_choose_us_title, why_choose_us_description, why_choose_us_items,
                testimonials_title, testimonials_description, testimonials,
                faq_title, faq_description, faqs,
                footer_tagline, footer_address, footer_phone, footer_email
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14,
                    $15, $16, $17, $18, $19, $20, $21, $22, $23, $24, $25, $26, $27)
            RETURNING *
            "#,
        )
        .bind(&dto.hero_title)
        .bind(&dto.hero_description)
        .bind(&dto.hero_button1)
        .bind(&dto.hero_button2)
        .bind(&dto.doctor_name)
        .bind(&dto.doctor_title)
        .bind(&dto.doctor_description)
        .bind(&dto.happy_patients)
        .bind(&dto.years_experience)
        .bind(&dto.specialist_doctors)
        .bind(&dto.positive_feedback)
        .bind(&dto.services_title)
        .bind(&dto.services_description)
        .bind(&dto.services)
        .bind(&dto.why_choose_us_title)
        .bind(&dto.why_choose_us_description)
        .bind(&dto.why_choose_us_items)
        .bind(&dto.testimonials_title)
        .bind(&dto.testimonials_description)
        .bind(&dto.testimonials)
        .bind(&dto.faq_title)
        .bind(&dto.faq_description)
        .bind(&dto.faqs)
        .bind(&dto.footer_tagline)
        .bind(&dto.footer_address)
        .bind(&dto.footer_phone)
        .bind(&dto.footer_email)
        .fetch_one(&self.pool)
        .await?;
        Ok(content)
    }

    pub async fn update(
        &self,
        id: uuid::Uuid,
        dto: &UpdateHomePageContentDto,
    ) -> Result<Option<HomePageContent>> {
        let content = sqlx::query_as::<_, HomePageContent>(
            r#"
            UPDATE home_page_content SET
                hero_title = COALESCE($2, hero_title),
                hero_description = COALESCE($3, hero_description),
                hero_button1 = COALESCE($4, hero_button1),
                hero_button2 = COALESCE($5, hero_button2),
                doctor_name = COALESCE($6, doctor_name),
                doctor_title = COALESCE($7, doctor_title),
                doctor_description = COALESCE($8, doctor_description),
                happy_patients = COALESCE($9, happy_patients),
                years_experience = COALESCE($10, years_experience),
                specialist_doctors = COALESCE($11, specialist_doctors),
                positive_feedback = COALESCE($12, positive_feedback),
                services_title = COALESCE($13, services_title),
                services_description = COALESCE($14, services_description),
                services = COALESCE($15, services),
                why_choose_us_title = COALESCE($16, why_choose_us_title),
                why_choose_us_description = COALESCE($17, why_choose_us_description),
                why_choose_us_items = COALESCE($18, why_choose_us_items),
                testimonials_title = COALESCE($19, testimonials_title),
                testimonials_description = COALESCE($20, testimonials_description),
                testimonials = COALESCE($21, testimonials),
                faq_title = COALESCE($22, faq_title),
                faq_description = COALESCE($23, faq_description),
                faqs = COALESCE($24, faqs),
                footer_tagline = COALESCE($25, footer_tagline),
                footer_address = COALESCE($26, footer_address),
                footer_phone = COALESCE($27, footer_phone),
                footer_email = COALESCE($28, footer_email),
                updated_at = now()
            WHERE id = $1
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(&dto.hero_title)
        .bind(&dto.hero_description)
        .bind(&dto.hero_button1)
        .bind(&dto.hero_button2)
        .bind(&dto.doctor_name)
        .bind(&dto.doctor_title)
        .bind(&dto.doctor_description)
        .bind(&dto.happy_patients)
        .bind(&dto.years_experience)
        .bind(&dto.specialist_doctors)
        .bind(&dto.positive_feedback)
        .bind(&dto.services_title)
        .bind(&dto.services_description)
        .bind(&dto.services)
        .bind(&dto.why_choose_us_title)
        .bind(&dto.why_choose_us_description)
        .bind(&dto.why_choose_us_items)
        .bind(&dto.testimonials_title)
        .bind(&dto.testimonials_description)
        .bind(&dto.testimonials)
        .bind(&dto.faq_title)
        .bind(&dto.faq_description)
        .bind(&dto.faqs)
        .bind(&dto.footer_tagline)
        .bind(&dto.footer_address)
        .bind(&dto.footer_phone)
        .bind(&dto.footer_email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(content)
    }
}
