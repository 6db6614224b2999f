use super::Attachment;
use super::Message;
use super::Role;

#[test]
fn it_executes_new() {
    let msg = Message::new(Role::Assistant, "Hi there!");
    assert_eq!(msg.role, Role::Assistant);
    assert_eq!(msg.role.to_string(), "assistant");
    assert_eq!(msg.content, "Hi there!".to_string());
    assert!(msg.attachment.is_none());
}

#[test]
fn it_executes_user_with_attachment() {
    let msg = Message::user("Summarize this", Some(Attachment::new("notes.txt", "abc")));
    assert_eq!(msg.role, Role::User);
    assert_eq!(msg.attachment.unwrap().name, "notes.txt");
}

#[test]
fn it_serializes_without_attachment() {
    let msg = Message::assistant("Hi");
    insta::assert_snapshot!(serde_json::to_string(&msg).unwrap(), @r###"{"role":"assistant","content":"Hi"}"###);
}

#[test]
fn it_deserializes_null_attachment() {
    let msg: Message =
        serde_json::from_str(r#"{"role":"user","content":"Hello","attachment":null}"#).unwrap();
    assert_eq!(msg, Message::user("Hello", None));
}

#[test]
fn it_flattens_attachment_into_conversation() {
    let msg = Message::user(
        "What does this do?",
        Some(Attachment::new("main.rs", "fn main() {}")),
    );

    insta::assert_snapshot!(msg.to_conversation().content, @r###"
    What does this do?

    main.rs:
    ```
    fn main() {}
    ```
    "###);
}

#[test]
fn it_flattens_attachment_without_content() {
    let msg = Message::user("", Some(Attachment::new("a.txt", "x")));
    assert_eq!(msg.to_conversation().content, "a.txt:\n```\nx\n```");
}

#[test]
fn it_keeps_plain_content_in_conversation() {
    let msg = Message::assistant("Hi there");
    let conversation = msg.to_conversation();
    assert_eq!(conversation.role, Role::Assistant);
    assert_eq!(conversation.content, "Hi there");
}
