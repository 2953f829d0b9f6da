//! Public home page content. A singleton row edited from the admin panel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct HomePageContent {
    pub id: Uuid,
    pub hero_title: Option<String>,
    pub hero_description: Option<String>,
    pub hero_button1: Option<String>,
    pub hero_button2: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_title: Option<String>,
    pub doctor_description: Option<String>,
    pub happy_patients: Option<String>,
    pub years_experience: Option<String>,
    pub specialist_doctors: Option<String>,
    pub positive_feedback: Option<String>,
    pub services_title: Option<String>,
    pub services_description: Option<String>,
    pub services: Option<serde_json::Value>,
    pub why_choose_us_title: Option<String>,
    pub why_choose_us_description: Option<String>,
    pub why_choose_us_items: Option<serde_json::Value>,
    pub testimonials_title: Option<String>,
    pub testimonials_description: Option<String>,
    pub testimonials: Option<serde_json::Value>,
    pub faq_title: Option<String>,
    pub faq_description: Option<String>,
    pub faqs: Option<serde_json::Value>,
    pub footer_tagline: Option<String>,
    pub footer_address: Option<String>,
    pub footer_phone: Option<String>,
    pub footer_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHomePageContentDto {
    pub hero_title: Option<String>,
    pub hero_description: Option<String>,
    pub hero_button1: Option<String>,
    pub hero_button2: Option<String>,
    pub doctor_name: Option<String>,
    pub doctor_title: Option<String>,
    pub doctor_description: Option<String>,
    pub happy_patients: Option<String>,
    pub years_experience: Option<String>,
    pub specialist_doctors: Option<String>,
    pub positive_feedback: Option<String>,
    pub services_title: Option<String>,
    pub services_description: Option<String>,
    pub services: Option<serde_json::Value>,
    pub why_choose_us_title: Option<String>,
    pub why_choose_us_description: Option<String>,
    pub why_choose_us_items: Option<serde_json::Value>,
    pub testimonials_title: Option<String>,
    pub testimonials_description: Option<String>,
    pub testimonials: Option<serde_json::Value>,
    pub faq_title: Option<String>,
    pub faq_description: Option<String>,
    pub faqs: Option<serde_json::Value>,
    pub footer_tagline: Option<String>,
    pub footer_address: Option<String>,
    pub footer_phone: Option<String>,
    pub footer_email: Option<String>,
}

/// Content served before anything has been saved from the admin panel.
pub fn default_content() -> serde_json::Value {
    serde_json::json!({
        "heroTitle": "Your Health, Our Priority. Compassionate Care, Always.",
        "heroDescription": "Experience dedicated and personalized healthcare. Our team of experts is here to support you on your journey to wellness.",
        "heroButton1": "Book an Appointment",
        "heroButton2": "Find a Doctor",
        "doctorName": "Dr. Evelyn Reed",
        "doctorTitle": "Lead Cardiologist, MD",
        "doctorDescription": "Dr. Evelyn Reed is a board-certified cardiologist with over 15 years of experience in diagnosing and treating a wide range of cardiovascular conditions.",
        "happyPatients": "12,000+",
        "yearsExperience": "15+",
        "specialistDoctors": "50+",
        "positiveFeedback": "98%",
        "servicesTitle": "Our Services",
        "servicesDescription": "We offer a wide range of medical services to ensure you and your family receive the best care.",
        "services": [],
        "whyChooseUsTitle": "Why Choose Us?",
        "whyChooseUsDescription": "We are committed to delivering exceptional healthcare with a personal touch.",
        "whyChooseUsItems": [],
        "testimonialsTitle": "What Our Patients Say",
        "testimonialsDescription": "Real stories from our valued patients.",
        "faqTitle": "Frequently Asked Questions",
        "faqDescription": "Find answers to common questions about our services and procedures.",
        "testimonials": [],
        "faqs": [],
        "footerTagline": "Providing quality healthcare for a better life.",
        "footerAddress": "123 Health St, Wellness City, 12345",
        "footerPhone": "(123) 456-7890",
        "footerEmail": "contact@healthsystem.com",
    })
}
