pub mod button_click;
pub mod feedback;
pub mod nfc_code;
pub mod nfc_profile;
pub mod profile_button;
pub mod profile_visit;
pub mod user_account;
pub mod user_role;

pub use button_click::Entity as ButtonClickEntity;
pub use feedback::Entity as FeedbackEntity;
pub use nfc_code::Entity as NfcCodeEntity;
pub use nfc_profile::Entity as NfcProfileEntity;
pub use profile_button::Entity as ProfileButtonEntity;
pub use profile_visit::Entity as ProfileVisitEntity;
pub use user_account::Entity as UserAccountEntity;
pub use user_role::Entity as UserRoleEntity;
