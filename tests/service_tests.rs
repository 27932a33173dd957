//! Service layer integration tests
//!
//! 使用临时 SQLite，覆盖认领、生成、资料按钮、访问统计与反馈。

mod common;

use tappio::errors::TappioError;
use tappio::services::{NewButton, NewFeedback, Navigation, PlaqueUpdate, ProfileUpdate};
use tappio::storage::{ButtonAction, CodeType, FeedbackStatus, Role};

use common::setup;

// =============================================================================
// Claim
// =============================================================================

#[tokio::test]
async fn test_claim_profile_code_creates_profile() {
    let env = setup().await;
    env.seed_code("AB12CD", CodeType::Profile).await;
    let (user, _) = env.sign_up("owner@example.com").await;

    let result = env
        .services
        .codes
        .claim("ab12cd", &user.user_id)
        .await
        .expect("claim should succeed");

    let profile_id = result.profile_id.expect("profile code creates a profile");
    assert_eq!(result.code.assigned_to.as_deref(), Some(user.user_id.as_str()));
    assert!(result.code.is_active);
    assert_eq!(
        result.code.url.as_deref(),
        Some(format!("/profile/{}/view", profile_id).as_str())
    );

    let navigation = env.services.codes.scan("AB12CD").await;
    assert_eq!(
        navigation,
        Navigation::Internal(format!("/profile/{}/view", profile_id))
    );
}

#[tokio::test]
async fn test_double_claim_is_rejected() {
    let env = setup().await;
    env.seed_code("ZZ99YY", CodeType::Profile).await;
    let (first, _) = env.sign_up("first@example.com").await;
    let (second, _) = env.sign_up("second@example.com").await;

    env.services
        .codes
        .claim("ZZ99YY", &first.user_id)
        .await
        .expect("first claim should succeed");

    let err = env
        .services
        .codes
        .claim("ZZ99YY", &second.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::AlreadyAssigned(_)), "got {:?}", err);

    // 原所有者保持不变
    let record = env.storage.find_code("ZZ99YY").await.unwrap().unwrap();
    assert_eq!(record.assigned_to.as_deref(), Some(first.user_id.as_str()));
}

#[tokio::test]
async fn test_conditional_claim_on_assigned_code_writes_nothing() {
    let env = setup().await;
    env.seed_code("RACE01", CodeType::Profile).await;
    let (first, _) = env.sign_up("winner@example.com").await;
    let (second, _) = env.sign_up("loser@example.com").await;

    env.services
        .codes
        .claim("RACE01", &first.user_id)
        .await
        .expect("first claim should succeed");
    let before = env.storage.find_code("RACE01").await.unwrap().unwrap();

    // 跳过服务层预检，直接走条件更新
    let outcome = env
        .storage
        .claim_code(&before.id, &second.user_id, |id| format!("/profile/{}/view", id))
        .await
        .unwrap();
    assert!(outcome.is_none());

    let after = env.storage.find_code("RACE01").await.unwrap().unwrap();
    assert_eq!(after.assigned_to.as_deref(), Some(first.user_id.as_str()));
    assert_eq!(after.assigned_at, before.assigned_at);
    assert_eq!(after.url, before.url);

    let profiles = env.storage.profiles_for_code(&before.id).await.unwrap();
    assert_eq!(profiles.len(), 1);
    assert_eq!(profiles[0].user_id, first.user_id);
}

#[tokio::test]
async fn test_claim_unknown_code_is_not_found() {
    let env = setup().await;
    let (user, _) = env.sign_up("nobody@example.com").await;

    let err = env
        .services
        .codes
        .claim("NOPE00", &user.user_id)
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::NotFound(_)), "got {:?}", err);
}

// =============================================================================
// Scan
// =============================================================================

#[tokio::test]
async fn test_scan_unknown_and_unclaimed_codes_go_to_activation() {
    let env = setup().await;
    env.seed_code("QW12ER", CodeType::Profile).await;

    assert_eq!(
        env.services.codes.scan("UNKNOWN1").await,
        Navigation::Internal("/activate/UNKNOWN1".into())
    );
    assert_eq!(
        env.services.codes.scan("QW12ER").await,
        Navigation::Internal("/activate/QW12ER".into())
    );
}

#[tokio::test]
async fn test_review_plaque_redirects_after_setup_and_counts_visits() {
    let env = setup().await;
    env.seed_code("REV12345", CodeType::Review).await;
    let (user, _) = env.sign_up("cafe@example.com").await;

    env.services
        .codes
        .claim("REV12345", &user.user_id)
        .await
        .unwrap();

    // 未设置跳转地址前仍回到激活页
    assert_eq!(
        env.services.codes.scan("REV12345").await,
        Navigation::Internal("/activate/REV12345".into())
    );

    env.services
        .plaques
        .update(
            "REV12345",
            &user.user_id,
            &PlaqueUpdate {
                title: "Cafe".into(),
                description: "Leave us a review".into(),
                redirect_url: "https://example.com/review".into(),
            },
        )
        .await
        .expect("plaque update should succeed");

    for _ in 0..2 {
        assert_eq!(
            env.services.codes.scan("REV12345").await,
            Navigation::External("https://example.com/review".into())
        );
    }

    let view = env
        .services
        .plaques
        .get("REV12345", &user.user_id)
        .await
        .unwrap();
    assert_eq!(view.visits, 2);
    assert_eq!(view.code.title.as_deref(), Some("Cafe"));
}

#[tokio::test]
async fn test_plaque_rejects_other_owner_and_bad_url() {
    let env = setup().await;
    env.seed_code("PLQ00001", CodeType::Review).await;
    let (owner, _) = env.sign_up("owner@example.com").await;
    let (other, _) = env.sign_up("other@example.com").await;
    env.services
        .codes
        .claim("PLQ00001", &owner.user_id)
        .await
        .unwrap();

    let update = PlaqueUpdate {
        title: "Shop".into(),
        description: "Thanks".into(),
        redirect_url: "https://example.com".into(),
    };
    let err = env
        .services
        .plaques
        .update("PLQ00001", &other.user_id, &update)
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Forbidden(_)), "got {:?}", err);

    let bad = PlaqueUpdate {
        redirect_url: "javascript:alert(1)".into(),
        ..update
    };
    let err = env
        .services
        .plaques
        .update("PLQ00001", &owner.user_id, &bad)
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Validation(_)), "got {:?}", err);
}

// =============================================================================
// Generate
// =============================================================================

#[tokio::test]
async fn test_generate_codes_are_unique_and_sized() {
    let env = setup().await;

    let profiles = env
        .services
        .codes
        .generate(50, CodeType::Profile, None)
        .await
        .unwrap();
    let reviews = env
        .services
        .codes
        .generate(20, CodeType::Review, None)
        .await
        .unwrap();

    assert_eq!(profiles.len(), 50);
    assert_eq!(reviews.len(), 20);
    assert!(profiles.iter().all(|c| c.code.len() == 6));
    assert!(reviews.iter().all(|c| c.code.len() == 8));
    assert!(profiles.iter().all(|c| !c.is_claimed()));

    let mut all: Vec<&str> = profiles
        .iter()
        .chain(reviews.iter())
        .map(|c| c.code.as_str())
        .collect();
    all.sort();
    all.dedup();
    assert_eq!(all.len(), 70);
    assert_eq!(env.storage.count_codes().await.unwrap(), 70);
}

#[tokio::test]
async fn test_generate_rejects_out_of_range_counts() {
    let env = setup().await;

    for count in [0, 501] {
        let err = env
            .services
            .codes
            .generate(count, CodeType::Profile, None)
            .await
            .unwrap_err();
        assert!(matches!(err, TappioError::Validation(_)), "got {:?}", err);
    }
    assert_eq!(env.storage.count_codes().await.unwrap(), 0);
}

#[tokio::test]
async fn test_export_csv_lists_only_unclaimed() {
    let env = setup().await;
    env.seed_code("AAA111", CodeType::Profile).await;
    env.seed_code("BBB222", CodeType::Profile).await;
    let (user, _) = env.sign_up("csv@example.com").await;
    env.services
        .codes
        .claim("AAA111", &user.user_id)
        .await
        .unwrap();

    let csv = String::from_utf8(env.services.codes.export_csv(None).await.unwrap()).unwrap();
    assert!(csv.contains("BBB222"));
    assert!(!csv.contains("AAA111"));
}

// =============================================================================
// Profiles & buttons
// =============================================================================

async fn claimed_profile(env: &common::TestEnv, code: &str, email: &str) -> (String, String) {
    env.seed_code(code, CodeType::Profile).await;
    let (user, _) = env.sign_up(email).await;
    let claimed = env
        .services
        .codes
        .claim(code, &user.user_id)
        .await
        .unwrap();
    (user.user_id, claimed.profile_id.unwrap())
}

fn link_button(label: &str, url: &str) -> NewButton {
    NewButton {
        label: label.into(),
        action_type: ButtonAction::Link,
        action_value: url.into(),
    }
}

#[tokio::test]
async fn test_profile_edit_and_public_view() {
    let env = setup().await;
    let (user_id, profile_id) = claimed_profile(&env, "PRF001", "ada@example.com").await;

    let updated = env
        .services
        .profiles
        .update(
            &profile_id,
            &user_id,
            ProfileUpdate {
                full_name: Some("Ada Lovelace".into()),
                company: Some("Analytical Engines".into()),
                website: Some("ada.dev".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name.as_deref(), Some("Ada Lovelace"));
    assert_eq!(updated.website.as_deref(), Some("https://ada.dev"));

    let public = env.services.profiles.public_view(&profile_id).await.unwrap();
    assert_eq!(public.full_name.as_deref(), Some("Ada Lovelace"));
    assert!(public.background_color.starts_with('#'));

    let dashboard = env.services.dashboard.for_user(&user_id).await.unwrap();
    assert_eq!(dashboard.profiles.len(), 1);
    assert_eq!(dashboard.profiles[0].visits, 1);
    assert_eq!(dashboard.profiles[0].code.as_deref(), Some("PRF001"));
}

#[tokio::test]
async fn test_profile_social_links_and_colors_persist() {
    let env = setup().await;
    let (user_id, profile_id) = claimed_profile(&env, "PRF003", "social@example.com").await;

    env.services
        .profiles
        .update(
            &profile_id,
            &user_id,
            ProfileUpdate {
                background_color: Some("#1A2B3C".into()),
                text_color: Some("#FFFFFF".into()),
                button_color: Some("#FF8800".into()),
                button_text_color: Some("#123".into()),
                facebook_url: Some("https://facebook.com/ada".into()),
                instagram_url: Some("https://instagram.com/ada".into()),
                linkedin_url: Some("https://linkedin.com/in/ada".into()),
                twitter_url: Some("https://twitter.com/ada".into()),
                youtube_url: Some("https://youtube.com/@ada".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let stored = env.storage.get_profile(&profile_id).await.unwrap().unwrap();
    assert_eq!(stored.background_color.as_deref(), Some("#1A2B3C"));
    assert_eq!(stored.text_color.as_deref(), Some("#FFFFFF"));
    assert_eq!(stored.button_color.as_deref(), Some("#FF8800"));
    assert_eq!(stored.button_text_color.as_deref(), Some("#123"));
    assert_eq!(stored.facebook_url.as_deref(), Some("https://facebook.com/ada"));
    assert_eq!(stored.instagram_url.as_deref(), Some("https://instagram.com/ada"));
    assert_eq!(stored.linkedin_url.as_deref(), Some("https://linkedin.com/in/ada"));
    assert_eq!(stored.twitter_url.as_deref(), Some("https://twitter.com/ada"));
    assert_eq!(stored.youtube_url.as_deref(), Some("https://youtube.com/@ada"));

    // 未提交的字段保持不变
    assert_eq!(stored.full_name, None);

    let public = env.services.profiles.public_view(&profile_id).await.unwrap();
    assert_eq!(public.background_color, "#1A2B3C");
}

#[tokio::test]
async fn test_profile_edit_by_non_owner_is_forbidden() {
    let env = setup().await;
    let (_, profile_id) = claimed_profile(&env, "PRF002", "owner@example.com").await;
    let (intruder, _) = env.sign_up("intruder@example.com").await;

    let err = env
        .services
        .profiles
        .update(&profile_id, &intruder.user_id, ProfileUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Forbidden(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_buttons_reorder_and_click_counts() {
    let env = setup().await;
    let (user_id, profile_id) = claimed_profile(&env, "BTN001", "buttons@example.com").await;
    let profiles = &env.services.profiles;

    let first = profiles
        .add_button(&profile_id, &user_id, link_button("Site", "example.com"))
        .await
        .unwrap();
    let second = profiles
        .add_button(
            &profile_id,
            &user_id,
            NewButton {
                label: "Mail".into(),
                action_type: ButtonAction::Email,
                action_value: "hi@example.com".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(first.action_value, "https://example.com");

    let reordered = profiles
        .reorder_buttons(
            &profile_id,
            &user_id,
            &[second.id.clone(), first.id.clone()],
        )
        .await
        .unwrap();
    let ids: Vec<&str> = reordered.iter().map(|b| b.id.as_str()).collect();
    assert_eq!(ids, vec![second.id.as_str(), first.id.as_str()]);

    let href = profiles.click(&profile_id, &second.id).await.unwrap();
    assert_eq!(href, "mailto:hi@example.com");
    profiles.click(&profile_id, &second.id).await.unwrap();
    profiles.click(&profile_id, &first.id).await.unwrap();

    let detail = profiles.detail(&profile_id, &user_id).await.unwrap();
    assert_eq!(detail.clicks.get(&second.id).copied(), Some(2));
    assert_eq!(detail.clicks.get(&first.id).copied(), Some(1));

    profiles
        .delete_button(&profile_id, &user_id, &first.id)
        .await
        .unwrap();
    let remaining = profiles.buttons(&profile_id, &user_id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].id, second.id);
}

#[tokio::test]
async fn test_button_added_after_deletes_goes_last() {
    let env = setup().await;
    let (user_id, profile_id) = claimed_profile(&env, "BTN003", "order@example.com").await;
    let profiles = &env.services.profiles;

    let a = profiles
        .add_button(&profile_id, &user_id, link_button("A", "a.example.com"))
        .await
        .unwrap();
    let b = profiles
        .add_button(&profile_id, &user_id, link_button("B", "b.example.com"))
        .await
        .unwrap();
    let c = profiles
        .add_button(&profile_id, &user_id, link_button("C", "c.example.com"))
        .await
        .unwrap();

    profiles.delete_button(&profile_id, &user_id, &a.id).await.unwrap();
    profiles.delete_button(&profile_id, &user_id, &b.id).await.unwrap();

    let d = profiles
        .add_button(&profile_id, &user_id, link_button("D", "d.example.com"))
        .await
        .unwrap();
    assert!(d.sort_order > c.sort_order);

    let labels: Vec<String> = profiles
        .buttons(&profile_id, &user_id)
        .await
        .unwrap()
        .into_iter()
        .map(|button| button.label)
        .collect();
    assert_eq!(labels, vec!["C", "D"]);
}

#[tokio::test]
async fn test_button_validation() {
    let env = setup().await;
    let (user_id, profile_id) = claimed_profile(&env, "BTN002", "val@example.com").await;

    let err = env
        .services
        .profiles
        .add_button(&profile_id, &user_id, link_button("  ", "https://example.com"))
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Validation(_)));

    let err = env
        .services
        .profiles
        .click(&profile_id, "missing-button")
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::NotFound(_)));
}

#[tokio::test]
async fn test_vcard_uses_profile_name() {
    let env = setup().await;
    let (user_id, profile_id) = claimed_profile(&env, "VCF001", "vcard@example.com").await;
    env.services
        .profiles
        .update(
            &profile_id,
            &user_id,
            ProfileUpdate {
                full_name: Some("Grace Hopper".into()),
                phone: Some("+1 555 0100".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let vcard = env.services.profiles.vcard(&profile_id).await.unwrap();
    assert_eq!(vcard.filename, "Grace Hopper.vcf");
    assert!(vcard.body.starts_with("BEGIN:VCARD"));
    assert!(vcard.body.contains("Grace Hopper"));
    assert!(vcard.body.contains("+1 555 0100"));
}

// =============================================================================
// Feedback & accounts
// =============================================================================

#[tokio::test]
async fn test_feedback_lifecycle() {
    let env = setup().await;
    let (user, _) = env.sign_up("fb@example.com").await;
    let feedback = &env.services.feedback;

    let err = feedback
        .submit(
            &user.user_id,
            &NewFeedback {
                title: " ".into(),
                description: "empty title".into(),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Validation(_)));

    let entry = feedback
        .submit(
            &user.user_id,
            &NewFeedback {
                title: "Dark mode".into(),
                description: "Please add a dark theme".into(),
            },
        )
        .await
        .unwrap();
    assert_eq!(entry.status, FeedbackStatus::New);

    let updated = feedback
        .set_status(&entry.id, FeedbackStatus::InProduction)
        .await
        .unwrap();
    assert_eq!(updated.status, FeedbackStatus::InProduction);

    let mine = feedback.mine(&user.user_id).await.unwrap();
    assert_eq!(mine.len(), 1);

    let all = feedback.all().await.unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].submitter_email.as_deref(), Some("fb@example.com"));
}

#[tokio::test]
async fn test_signup_rejects_duplicates_and_weak_passwords() {
    let env = setup().await;
    env.sign_up("dup@example.com").await;

    let err = env
        .services
        .accounts
        .signup(&tappio::services::Credentials {
            email: "DUP@example.com".into(),
            password: common::TEST_PASSWORD.into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Validation(_)), "got {:?}", err);

    let err = env
        .services
        .accounts
        .signup(&tappio::services::Credentials {
            email: "short@example.com".into(),
            password: "short".into(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Validation(_)), "got {:?}", err);
}

#[tokio::test]
async fn test_duplicate_email_insert_is_a_validation_error() {
    let env = setup().await;
    let (user, _) = env.sign_up("taken@example.com").await;

    // 绕过注册预检，直接撞唯一索引
    let err = env
        .storage
        .insert_account("taken@example.com", "$argon2id$placeholder", Role::User)
        .await
        .unwrap_err();
    assert!(matches!(err, TappioError::Validation(_)), "got {:?}", err);

    let account = env
        .storage
        .find_account_by_email("taken@example.com")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(account.id, user.user_id);
}
