use linkchat::auth::AuthManager;
use linkchat::chat::ChatManager;
use linkchat::contacts::ContactManager;
use std::path::Path;
use tempfile::tempdir;

async fn setup(dir: &Path) -> (AuthManager, ContactManager, ChatManager) {
    let auth = AuthManager::new(dir).await.unwrap();
    let contacts = ContactManager::new(dir).await.unwrap();
    let chat = ChatManager::new(dir).await.unwrap();
    (auth, contacts, chat)
}

async fn register(auth: &AuthManager, name: &str, link: &str) -> i64 {
    let (user, _) = auth
        .register(name.into(), "pw".into(), link.into())
        .await
        .unwrap();
    user.id
}

#[tokio::test]
async fn contact_edges_are_directional() {
    let dir = tempdir().unwrap();
    let (auth, contacts, _) = setup(dir.path()).await;

    let alice = register(&auth, "alice", "alice-link").await;
    let bob = register(&auth, "bob", "bob-link").await;

    assert!(contacts.add_contact(alice, bob).await.unwrap());

    let alices = contacts.list_contacts(alice).await.unwrap();
    assert_eq!(alices.len(), 1);
    assert_eq!(alices[0].contact_id, bob);
    assert_eq!(alices[0].username, "bob");

    // Adding alice -> bob does not create bob -> alice
    let bobs = contacts.list_contacts(bob).await.unwrap();
    assert!(bobs.is_empty());
    assert!(!contacts.is_contact(bob, alice).await.unwrap());
}

#[tokio::test]
async fn add_contact_screens_duplicates_at_request_time() {
    let dir = tempdir().unwrap();
    let (auth, contacts, _) = setup(dir.path()).await;

    let alice = register(&auth, "alice", "alice-link").await;
    let bob = register(&auth, "bob", "bob-link").await;

    assert!(contacts.add_contact(alice, bob).await.unwrap());
    assert!(!contacts.add_contact(alice, bob).await.unwrap());

    assert_eq!(contacts.list_contacts(alice).await.unwrap().len(), 1);
}

#[tokio::test]
async fn storage_accepts_duplicate_edges() {
    // Known weakness, preserved on purpose: the table has no uniqueness
    // constraint, so two adds racing past the check both land. Probed
    // here via the raw insert path.
    let dir = tempdir().unwrap();
    let (auth, contacts, _) = setup(dir.path()).await;

    let alice = register(&auth, "alice", "alice-link").await;
    let bob = register(&auth, "bob", "bob-link").await;

    contacts.insert_edge(alice, bob).await.unwrap();
    contacts.insert_edge(alice, bob).await.unwrap();

    let edges = contacts.list_contacts(alice).await.unwrap();
    assert_eq!(edges.len(), 2);
    assert!(edges.iter().all(|c| c.contact_id == bob));
}

#[tokio::test]
async fn history_is_bidirectional_and_oldest_first() {
    let dir = tempdir().unwrap();
    let (auth, _, chat) = setup(dir.path()).await;

    let alice = register(&auth, "alice", "alice-link").await;
    let bob = register(&auth, "bob", "bob-link").await;

    chat.send_message(alice, bob, "m1").await.unwrap();
    chat.send_message(bob, alice, "m2").await.unwrap();
    chat.send_message(alice, bob, "m3").await.unwrap();

    let history = chat.history_between(alice, bob).await.unwrap();
    let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m1", "m2", "m3"]);

    // Same conversation from bob's side
    let history = chat.history_between(bob, alice).await.unwrap();
    let contents: Vec<_> = history.iter().map(|m| m.content.as_str()).collect();
    assert_eq!(contents, vec!["m1", "m2", "m3"]);
}

#[tokio::test]
async fn history_excludes_third_parties() {
    let dir = tempdir().unwrap();
    let (auth, _, chat) = setup(dir.path()).await;

    let alice = register(&auth, "alice", "alice-link").await;
    let bob = register(&auth, "bob", "bob-link").await;
    let carol = register(&auth, "carol", "carol-link").await;

    chat.send_message(alice, bob, "for bob").await.unwrap();
    chat.send_message(alice, carol, "for carol").await.unwrap();

    let history = chat.history_between(alice, bob).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].content, "for bob");
}

#[tokio::test]
async fn sending_does_not_require_a_contact_edge() {
    // The write gate is absent by inherited design; only the chat view
    // checks the contact edge (covered by the router tests).
    let dir = tempdir().unwrap();
    let (auth, contacts, chat) = setup(dir.path()).await;

    let alice = register(&auth, "alice", "alice-link").await;
    let bob = register(&auth, "bob", "bob-link").await;

    assert!(!contacts.is_contact(alice, bob).await.unwrap());

    chat.send_message(alice, bob, "hi").await.unwrap();

    let history = chat.history_between(alice, bob).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].sender_id, alice);
    assert_eq!(history[0].receiver_id, bob);
}
