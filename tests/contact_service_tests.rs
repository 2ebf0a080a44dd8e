//! ContactService 集成测试

use std::sync::{Arc, Once};

use tempfile::TempDir;

use cardshare::config::init_config;
use cardshare::errors::CardshareError;
use cardshare::services::{
    CardService, ContactListFilter, ContactListQuery, ContactService, CreateCardRequest,
    CreateContactRequest, UpdateCardRequest, UpdateContactRequest,
};
use cardshare::storage::{SeaOrmStorage, SourceType};

static INIT: Once = Once::new();

fn init_test_config() {
    INIT.call_once(|| {
        init_config();
    });
}

struct TestEnv {
    _dir: TempDir,
    cards: CardService,
    contacts: ContactService,
}

async fn setup() -> TestEnv {
    init_test_config();
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("contacts_test.db").display()
    );
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    TestEnv {
        _dir: dir,
        cards: CardService::new(storage.clone()),
        contacts: ContactService::new(storage),
    }
}

fn contact(name: &str, company: Option<&str>) -> CreateContactRequest {
    CreateContactRequest {
        full_name: Some(name.to_string()),
        company: company.map(String::from),
        ..Default::default()
    }
}

#[tokio::test]
async fn test_create_contact_defaults() {
    let env = setup().await;

    let c = env
        .contacts
        .create_contact(
            "user_1",
            CreateContactRequest {
                full_name: Some("  ".into()),
                tags: Some(vec![" vip ".into(), "".into(), "lead".into()]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(c.id.starts_with("contact_"));
    assert_eq!(c.full_name, "Unknown Contact");
    assert_eq!(c.source_type, SourceType::Manual);
    assert_eq!(c.tags, vec!["vip".to_string(), "lead".to_string()]);
    assert!(!c.is_favorite);
    assert!(c.last_contacted.is_none());

    let stored = env.contacts.get_contact("user_1", &c.id).await.unwrap();
    assert_eq!(stored.tags, c.tags);
    assert_eq!(stored.full_name, "Unknown Contact");
}

#[tokio::test]
async fn test_create_contact_rejects_bad_website() {
    let env = setup().await;
    let err = env
        .contacts
        .create_contact(
            "user_1",
            CreateContactRequest {
                full_name: Some("Eve".into()),
                website: Some("javascript:void(0)".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::Validation(_)));
}

#[tokio::test]
async fn test_search_is_case_insensitive() {
    let env = setup().await;

    env.contacts
        .create_contact("user_1", contact("John Smith", Some("Acme Corp")))
        .await
        .unwrap();
    env.contacts
        .create_contact("user_1", contact("Jane Doe", Some("Globex")))
        .await
        .unwrap();
    env.contacts
        .create_contact("user_2", contact("Other Acme", Some("ACME")))
        .await
        .unwrap();

    let found = env.contacts.search_contacts("user_1", "acme").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].full_name, "John Smith");

    let found = env.contacts.search_contacts("user_1", "JANE").await.unwrap();
    assert_eq!(found.len(), 1);

    let all = env.contacts.search_contacts("user_1", "").await.unwrap();
    assert_eq!(all.len(), 2);
}

#[tokio::test]
async fn test_list_favorites_filter() {
    let env = setup().await;

    let a = env
        .contacts
        .create_contact("user_1", contact("Alpha", None))
        .await
        .unwrap();
    env.contacts
        .create_contact("user_1", contact("Beta", None))
        .await
        .unwrap();

    assert!(env.contacts.toggle_favorite("user_1", &a.id).await.unwrap());

    let favorites = env
        .contacts
        .list_contacts(
            "user_1",
            ContactListQuery {
                filter: Some(ContactListFilter::Favorites),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].id, a.id);

    let recent = env
        .contacts
        .list_contacts(
            "user_1",
            ContactListQuery {
                filter: Some(ContactListFilter::Recent),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(recent.len(), 2);

    assert!(!env.contacts.toggle_favorite("user_1", &a.id).await.unwrap());
    let stored = env.contacts.get_contact("user_1", &a.id).await.unwrap();
    assert!(!stored.is_favorite);
}

#[tokio::test]
async fn test_update_and_mark_contacted() {
    let env = setup().await;

    let c = env
        .contacts
        .create_contact(
            "user_1",
            CreateContactRequest {
                full_name: Some("Linus".into()),
                email: Some("linus@example.com".into()),
                phone: Some("+1 555 0100".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let updated = env
        .contacts
        .update_contact(
            "user_1",
            &c.id,
            UpdateContactRequest {
                email: Some("".into()),
                notes: Some("met at conf".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.full_name, "Linus");
    assert_eq!(updated.email, None);
    assert_eq!(updated.phone.as_deref(), Some("+1 555 0100"));
    assert_eq!(updated.notes.as_deref(), Some("met at conf"));

    let contacted = env.contacts.mark_contacted("user_1", &c.id).await.unwrap();
    assert!(contacted.last_contacted.is_some());

    let stored = env.contacts.get_contact("user_1", &c.id).await.unwrap();
    assert!(stored.last_contacted.is_some());
    assert_eq!(stored.email, None);
}

#[tokio::test]
async fn test_contacts_are_scoped_to_owner() {
    let env = setup().await;

    let c = env
        .contacts
        .create_contact("alice", contact("Private", None))
        .await
        .unwrap();

    assert!(matches!(
        env.contacts.get_contact("bob", &c.id).await,
        Err(CardshareError::NotFound(_))
    ));
    assert!(matches!(
        env.contacts.toggle_favorite("bob", &c.id).await,
        Err(CardshareError::NotFound(_))
    ));
    assert!(matches!(
        env.contacts.delete_contact("bob", &c.id).await,
        Err(CardshareError::NotFound(_))
    ));
    assert!(env.contacts.get_user_contacts("bob").await.unwrap().is_empty());

    env.contacts.delete_contact("alice", &c.id).await.unwrap();
    assert!(env.contacts.get_user_contacts("alice").await.unwrap().is_empty());
}

#[tokio::test]
async fn test_save_public_card_as_contact() {
    let env = setup().await;

    let card = env
        .cards
        .create_card(
            "owner",
            CreateCardRequest {
                full_name: Some("Ada Lovelace".into()),
                email: Some("ada@example.com".into()),
                company: Some("Analytical Engines".into()),
                job_title: Some("Analyst".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let saved = env
        .contacts
        .save_card_as_contact("viewer", &card.id)
        .await
        .unwrap();
    assert_eq!(saved.user_id, "viewer");
    assert_eq!(saved.full_name, "Ada Lovelace");
    assert_eq!(saved.email.as_deref(), Some("ada@example.com"));
    assert_eq!(saved.company.as_deref(), Some("Analytical Engines"));
    assert_eq!(saved.source_type, SourceType::CardShare);
    assert_eq!(saved.source_card_id.as_deref(), Some(card.id.as_str()));

    let refreshed = env.cards.get_card("owner", &card.id).await.unwrap();
    assert_eq!(refreshed.contact_count, 1);
}

#[tokio::test]
async fn test_save_private_card_is_not_found() {
    let env = setup().await;

    let card = env
        .cards
        .create_card(
            "owner",
            CreateCardRequest {
                full_name: Some("Hidden".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    env.cards
        .update_card(
            "owner",
            &card.id,
            UpdateCardRequest {
                is_public: Some(false),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    let err = env
        .contacts
        .save_card_as_contact("viewer", &card.id)
        .await
        .unwrap_err();
    assert!(matches!(err, CardshareError::NotFound(_)));

    let refreshed = env.cards.get_card("owner", &card.id).await.unwrap();
    assert_eq!(refreshed.contact_count, 0);
    assert!(env.contacts.get_user_contacts("viewer").await.unwrap().is_empty());
}
