//! Test data builders
//!
//! Request payload builders for the integration suites. Identifying fields
//! (usernames, emails, college names) derive from a caller-supplied tag so
//! repeated builds inside one test never collide; descriptive fields come
//! from `fake`.

use chrono::{Duration, Utc};
use fake::faker::address::en::CityName;
use fake::faker::company::en::CompanyName;
use fake::faker::lorem::en::Sentence;
use fake::faker::name::en::Name;
use fake::Fake;

use CampusBuddy::models::admin::AdminRegisterRequest;
use CampusBuddy::models::event::{CreateEventRequest, CreateSponsorRequest, UpdateEventRequest};
use CampusBuddy::models::registration::RegisterRequest;
use CampusBuddy::models::ugc::{PostReviewRequest, PostUgcRequest, UploadFile};
use CampusBuddy::models::user::SignupRequest;

/// Password used for every account the builders sign up
pub const TEST_PASSWORD: &str = "orientation-week-2026";

/// Signup payload builder keyed by a lowercase tag
pub struct TestSignup {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl TestSignup {
    pub fn new(tag: &str) -> Self {
        Self {
            username: format!("{}_student", tag),
            email: format!("{}@students.example.edu", tag),
            password: TEST_PASSWORD.to_string(),
        }
    }

    pub fn request(&self) -> SignupRequest {
        SignupRequest {
            username: self.username.clone(),
            email: self.email.clone(),
            password: self.password.clone(),
        }
    }
}

/// Admin registration payload builder, college included
pub struct TestAdminSignup {
    pub full_name: String,
    pub admin_name: String,
    pub email: String,
    pub college_name: String,
    pub college_location: String,
}

impl TestAdminSignup {
    pub fn new(tag: &str) -> Self {
        Self {
            full_name: Name().fake(),
            admin_name: format!("{}_admin", tag),
            email: format!("{}@staff.example.edu", tag),
            college_name: format!("College of {}", tag),
            college_location: CityName().fake(),
        }
    }

    pub fn with_college_name(mut self, name: &str) -> Self {
        self.college_name = name.to_string();
        self
    }

    pub fn request(&self) -> AdminRegisterRequest {
        AdminRegisterRequest {
            full_name: self.full_name.clone(),
            admin_name: self.admin_name.clone(),
            contact_no: "98765 43210".to_string(),
            email: self.email.clone(),
            gender: "F".to_string(),
            password: TEST_PASSWORD.to_string(),
            college_name: self.college_name.clone(),
            college_contact_no: Some("020 2550 1234".to_string()),
            college_email: None,
            college_location: Some(self.college_location.clone()),
        }
    }
}

/// An event two weeks out with faked description and venue
pub fn upcoming_event(title: &str) -> CreateEventRequest {
    CreateEventRequest {
        title: title.to_string(),
        description: Some(Sentence(4..9).fake()),
        date_time: Some(Utc::now() + Duration::days(14)),
        location: Some(CityName().fake()),
    }
}

/// The same payload as an edit, the create and edit forms share fields
pub fn edit_request(request: &CreateEventRequest) -> UpdateEventRequest {
    UpdateEventRequest {
        title: request.title.clone(),
        description: request.description.clone(),
        date_time: request.date_time,
        location: request.location.clone(),
    }
}

pub fn registration_for(plan: &str, payment_method: &str, pay_now: bool) -> RegisterRequest {
    RegisterRequest {
        plan: plan.to_string(),
        payment_method: payment_method.to_string(),
        pay_now,
    }
}

/// The common case: standard plan over Google Pay
pub fn standard_registration(pay_now: bool) -> RegisterRequest {
    registration_for("standard", "Google Pay", pay_now)
}

pub fn text_post(caption: &str) -> PostUgcRequest {
    PostUgcRequest {
        content_type: "text".to_string(),
        caption: caption.to_string(),
        upload: None,
        image_url: None,
    }
}

pub fn photo_post_with_upload(caption: &str, filename: &str) -> PostUgcRequest {
    PostUgcRequest {
        content_type: "photo".to_string(),
        caption: caption.to_string(),
        upload: Some(photo_upload(filename)),
        image_url: None,
    }
}

pub fn photo_post_with_url(caption: &str, image_url: &str) -> PostUgcRequest {
    PostUgcRequest {
        content_type: "photo".to_string(),
        caption: caption.to_string(),
        upload: None,
        image_url: Some(image_url.to_string()),
    }
}

/// A small in-memory upload with a JPEG magic prefix
pub fn photo_upload(filename: &str) -> UploadFile {
    let mut bytes = vec![0xFF, 0xD8, 0xFF, 0xE0];
    bytes.extend_from_slice(&[0x00; 64]);
    UploadFile {
        filename: filename.to_string(),
        bytes,
    }
}

pub fn review(rating: i32, comment: &str) -> PostReviewRequest {
    PostReviewRequest {
        rating,
        comment: comment.to_string(),
    }
}

pub fn sample_sponsor(tag: &str) -> CreateSponsorRequest {
    CreateSponsorRequest {
        sponsor_name: format!("{} ({})", CompanyName().fake::<String>(), tag),
        email: Some(format!("sponsor@{}.example.com", tag)),
        phone: Some("91234 56789".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_builder_derives_identity_from_tag() {
        let signup = TestSignup::new("alpha");
        assert_eq!(signup.username, "alpha_student");
        assert_eq!(signup.email, "alpha@students.example.edu");
        assert_eq!(signup.request().password, TEST_PASSWORD);
    }

    #[test]
    fn test_admin_builder_overrides() {
        let admin = TestAdminSignup::new("beta").with_college_name("Override College");
        let request = admin.request();
        assert_eq!(request.admin_name, "beta_admin");
        assert_eq!(request.college_name, "Override College");
        assert!(!request.full_name.is_empty());
    }

    #[test]
    fn test_photo_upload_has_jpeg_prefix() {
        let upload = photo_upload("crowd.jpg");
        assert_eq!(&upload.bytes[..2], &[0xFF, 0xD8]);
        assert!(upload.bytes.len() > 4);
    }

    #[test]
    fn test_event_builder_is_upcoming() {
        let request = upcoming_event("Fresher Welcome");
        assert_eq!(request.title, "Fresher Welcome");
        assert!(request.date_time.expect("date set") > Utc::now());
    }
}
