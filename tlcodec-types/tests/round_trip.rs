//! `decode(encode(x)) == x` for every constructor, optionals absent and set.

use tlcodec_types::functions::chat;
use tlcodec_types::{boxed, EncodeContext, Registry, TlObject, LAYER};

fn strict() -> EncodeContext {
    EncodeContext::strict(LAYER)
}

fn tag_of(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes[..4].try_into().unwrap())
}

fn flags_of(bytes: &[u8]) -> u32 {
    u32::from_le_bytes(bytes[4..8].try_into().unwrap())
}

fn round_trip<T: TlObject + Default + PartialEq>(value: &T) -> Vec<u8> {
    let bytes = value.encode(strict()).unwrap();
    let mut decoded = T::default();
    decoded.decode(&bytes).unwrap();
    assert_eq!(&decoded, value);
    bytes
}

fn empty_photo() -> boxed::Photo {
    let mut photo = boxed::Photo::default();
    photo.to_photo_empty().set_id(11);
    photo
}

fn full_photo() -> boxed::Photo {
    let mut photo = boxed::Photo::default();
    photo.to_photo();
    photo.has_stickers = true;
    photo.id = 1;
    photo.access_hash = 2;
    photo.file_reference = vec![0xde, 0xad];
    photo.date = 3;
    let mut stripped = boxed::PhotoSize::default();
    {
        let mut view = stripped.to_photo_stripped_size();
        view.set_type("i".to_owned());
        view.set_bytes(vec![1; 300]);
    }
    let mut size = boxed::PhotoSize::default();
    {
        let mut view = size.to_photo_size();
        view.set_type("m".to_owned());
        view.set_w(320);
        view.set_h(240);
        view.set_size(1024);
    }
    photo.sizes = vec![stripped, size];
    let mut video = boxed::VideoSize::default();
    video.r#type = "u".to_owned();
    video.video_start_ts = Some(0.25);
    photo.video_sizes = Some(vec![video]);
    photo.dc_id = 4;
    photo
}

// ── Defaults, walked through the registry ─────────────────────────────────────

#[test]
fn every_constructor_round_trips_from_its_defaults() {
    let registry = Registry::global();
    let mut needs_nested = Vec::new();
    for entry in registry.entries() {
        let object = (entry.factory)();
        let Some((layer, bytes)) = (0..=LAYER).find_map(|layer| {
            let bytes = object.encode(EncodeContext::strict(layer)).ok()?;
            (tag_of(&bytes) == entry.id).then_some((layer, bytes))
        }) else {
            needs_nested.push(entry.name);
            continue;
        };

        let decoded = registry
            .decode_bytes(&bytes)
            .unwrap_or_else(|e| panic!("{}: {e}", entry.name));
        assert_eq!(decoded.constructor_id(), entry.id);
        assert_eq!(decoded.predicate_name(), entry.name);
        assert_eq!(
            decoded.encode(EncodeContext::strict(layer)).unwrap(),
            bytes,
            "{} at layer {layer}",
            entry.name
        );
    }
    // both carry a required Photo, which has no default variant
    needs_nested.sort();
    assert_eq!(needs_nested, ["chat.editChatPhoto", "chatInvite"]);
}

// ── Every optional present ────────────────────────────────────────────────────

#[test]
fn photo_with_every_optional() {
    let photo = full_photo();
    let bytes = round_trip(&photo);
    assert_eq!(flags_of(&bytes), 0b11);
}

#[test]
fn photo_size_variants() {
    for name in ["photoSizeEmpty", "photoSize", "photoStrippedSize", "photoSizeProgressive"] {
        let mut size = boxed::PhotoSize::default();
        assert!(size.set_predicate(name));
        size.r#type = "s".to_owned();
        size.w = 1;
        size.h = 2;
        size.size = 3;
        size.bytes = vec![9; 5];
        size.sizes = vec![4, 5];

        let bytes = size.encode(strict()).unwrap();
        let mut decoded = boxed::PhotoSize::default();
        decoded.decode(&bytes).unwrap();
        assert_eq!(decoded.identity().predicate(), Some(name));
        assert_eq!(decoded.encode(strict()).unwrap(), bytes);
    }
}

#[test]
fn banned_rights_with_every_flag() {
    let mut rights = boxed::ChatBannedRights::default();
    rights.view_messages = true;
    rights.send_messages = true;
    rights.send_media = true;
    rights.send_stickers = true;
    rights.send_gifs = true;
    rights.send_games = true;
    rights.send_inline = true;
    rights.embed_links = true;
    rights.send_polls = true;
    rights.change_info = true;
    rights.invite_users = true;
    rights.pin_messages = true;
    rights.until_date = 99;
    let bytes = round_trip(&rights);
    assert_eq!(flags_of(&bytes), 0x1ff | 1 << 10 | 1 << 15 | 1 << 17);
}

#[test]
fn mutable_chat_with_every_optional() {
    let mut chat = boxed::MutableChat::default();
    chat.chat.id = 5;
    chat.chat.title = "Ops".to_owned();
    chat.chat.photo = Some(full_photo());
    chat.chat.migrated_to_id = Some(6);
    chat.chat.migrated_to_access_hash = Some(7);
    chat.chat.available_reactions = vec!["👍".to_owned(), "🔥".to_owned()];
    chat.chat.default_banned_rights.send_polls = true;

    let mut participant = boxed::ImmutableChatParticipant::default();
    participant.id = 1;
    participant.user_id = 8;
    participant.link = Some("t.me/+a".to_owned());
    participant.is_bot = true;
    chat.participants = vec![participant];

    let bytes = round_trip(&chat);
    // mutableChat has no flags; immutableChat's follow its tag
    assert_eq!(flags_of(&bytes[4..]), 0b111);
}

#[test]
fn exported_invite_variants() {
    let mut invite = boxed::ExportedChatInvite::default();
    invite.to_chat_invite_exported();
    invite.revoked = true;
    invite.permanent = true;
    invite.request_needed = true;
    invite.link = "t.me/+b".to_owned();
    invite.admin_id = 1;
    invite.date = 2;
    invite.start_date = Some(3);
    invite.expire_date = Some(4);
    invite.usage_limit = Some(5);
    invite.usage = Some(6);
    invite.requested = Some(7);
    invite.title = Some("x".to_owned());
    let bytes = round_trip(&invite);
    assert_eq!(flags_of(&bytes), 0x1ff);

    let mut public = boxed::ExportedChatInvite::default();
    public.to_chat_invite_public_join_requests();
    assert_eq!(round_trip(&public).len(), 4);
}

#[test]
fn importer_with_every_optional() {
    let mut importer = boxed::ChatInviteImporter::default();
    importer.requested = true;
    importer.user_id = 1;
    importer.date = 2;
    importer.about = Some("hi".to_owned());
    importer.approved_by = Some(3);
    let bytes = round_trip(&importer);
    assert_eq!(flags_of(&bytes), 0b111);
}

#[test]
fn invite_imported_with_requesters() {
    let mut imported = boxed::ChatInviteImported::default();
    imported.chat.chat.id = 4;
    let mut requesters = boxed::RecentChatInviteRequesters::default();
    requesters.requests_pending = 1;
    requesters.recent_requesters = vec![9];
    imported.requesters = Some(requesters);

    let bytes = round_trip(&imported);
    assert_eq!(flags_of(&bytes), 1);
}

#[test]
fn emoji_status_variants() {
    let mut status = boxed::EmojiStatus::default();
    status.to_emoji_status_empty();
    assert_eq!(round_trip(&status).len(), 4);

    status.to_emoji_status().set_document_id(7);
    assert_eq!(round_trip(&status).len(), 4 + 8);

    {
        let mut until = status.to_emoji_status_until();
        until.set_document_id(7);
        until.set_until(1_700_000_000);
    }
    assert_eq!(round_trip(&status).len(), 4 + 8 + 4);
}

#[test]
fn privacy_rule_variants() {
    for name in [
        "privacyValueAllowContacts",
        "privacyValueAllowAll",
        "privacyValueAllowUsers",
        "privacyValueDisallowContacts",
        "privacyValueDisallowAll",
        "privacyValueDisallowUsers",
        "privacyValueAllowChatParticipants",
        "privacyValueDisallowChatParticipants",
    ] {
        let mut rule = boxed::PrivacyRule::default();
        assert!(rule.set_predicate(name));
        rule.users = vec![1, 2];
        rule.chats = vec![3];

        let bytes = rule.encode(strict()).unwrap();
        let mut decoded = boxed::PrivacyRule::default();
        decoded.decode(&bytes).unwrap();
        assert_eq!(decoded.identity().predicate(), Some(name));
        assert_eq!(decoded.encode(strict()).unwrap(), bytes);
    }
}

#[test]
fn user_data_with_every_optional() {
    let mut user = boxed::UserData::default();
    user.id = 1;
    user.first_name = "Ann".to_owned();
    user.profile_photo = Some(full_photo());
    let mut bot = boxed::BotData::default();
    bot.id = 1;
    bot.token = "123:abc".to_owned();
    bot.bot_inline_placeholder = Some("search".to_owned());
    user.bot = Some(bot);
    user.about = Some("about".to_owned());
    let mut status = boxed::EmojiStatus::default();
    status.to_emoji_status().set_document_id(5);
    user.emoji_status = Some(status);
    let mut reason = boxed::RestrictionReason::default();
    reason.platform = "all".to_owned();
    user.restriction_reason = vec![reason];

    let bytes = round_trip(&user);
    assert_eq!(flags_of(&bytes), 0b1111);
}

// ── Methods with flags ────────────────────────────────────────────────────────

#[test]
fn export_chat_invite_with_every_optional() {
    let call = chat::ExportChatInvite {
        chat_id: 1,
        admin_id: 2,
        legacy_revoke_permanent: true,
        request_needed: true,
        expire_date: Some(3),
        usage_limit: Some(4),
        title: Some("t".to_owned()),
    };
    let bytes = round_trip(&call);
    assert_eq!(flags_of(&bytes), 0b1_1111);
}

#[test]
fn get_chat_invite_importers_with_every_optional() {
    let call = chat::GetChatInviteImporters {
        self_id: 1,
        chat_id: 2,
        requested: true,
        link: Some("t.me/+c".to_owned()),
        q: Some("bo".to_owned()),
        offset_date: 3,
        offset_user: 4,
        limit: 5,
    };
    let bytes = round_trip(&call);
    assert_eq!(flags_of(&bytes), 0b111);
}

#[test]
fn hide_chat_join_requests_with_every_optional() {
    let call = chat::HideChatJoinRequests {
        approved: true,
        self_id: 1,
        chat_id: 2,
        link: Some("t.me/+d".to_owned()),
        user_id: Some(3),
    };
    let bytes = round_trip(&call);
    assert_eq!(flags_of(&bytes), 0b111);
}

#[test]
fn edit_chat_photo_with_a_photo() {
    let call = chat::EditChatPhoto {
        chat_id: 1,
        edit_user_id: 2,
        chat_photo: full_photo(),
    };
    round_trip(&call);

    let call = chat::EditChatPhoto { chat_photo: empty_photo(), ..call };
    round_trip(&call);
}

#[test]
fn methods_without_flags() {
    round_trip(&chat::MigratedToChannel { chat: Default::default(), id: 1, access_hash: 2 });
    round_trip(&chat::SetChatAvailableReactions {
        self_id: 1,
        chat_id: 2,
        available_reactions_type: 1,
        available_reactions: vec!["❤".to_owned()],
    });
    round_trip(&chat::GetUsersChatIdList { id: vec![1, 2, 3] });
    round_trip(&chat::EditChatAdmin {
        chat_id: 1,
        operator_id: 2,
        edit_chat_admin_id: 3,
        is_admin: true,
    });
}
