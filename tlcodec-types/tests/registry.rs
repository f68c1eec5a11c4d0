use std::thread;

use tlcodec_types::deserialize::Error;
use tlcodec_types::functions::chat;
use tlcodec_types::registry::{make, Entry};
use tlcodec_types::{boxed, EncodeContext, Identifiable, Registry, RegistryError, TlObject, LAYER};

#[test]
fn global_knows_every_layer_of_a_predicate() {
    let registry = Registry::global();
    assert!(registry.contains(0xd07504a5));
    assert!(registry.contains(0xfb197a65));
    assert_eq!(registry.name_for_id(0xfb197a65), Some("photo"));
    assert_eq!(registry.name_for_id(0xfa30a8c7), Some("emojiStatusUntil"));
}

#[test]
fn global_covers_methods() {
    let registry = Registry::global();
    assert_eq!(
        registry.name_for_id(chat::GetExportedChatInvites::CONSTRUCTOR_ID),
        Some("chat.getExportedChatInvites")
    );
    assert_eq!(registry.name_for_id(0xdcd93dbf), Some("chat.importChatInvite2"));
    assert!(registry.resolve(chat::GetMutableChat::CONSTRUCTOR_ID).is_some());
    assert!(registry.len() > 34);
}

#[test]
fn dispatches_an_inbound_call_by_tag() {
    let call = chat::GetChatListByIdList { self_id: 1, id_list: vec![4, 5] };
    let bytes = call.encode(EncodeContext::strict(LAYER)).unwrap();

    let object = Registry::global().decode_bytes(&bytes).unwrap();
    assert_eq!(object.constructor_id(), 0xe740f539);
    let decoded = object.downcast::<chat::GetChatListByIdList>().unwrap();
    assert_eq!(*decoded, call);
}

#[test]
fn unknown_tag_is_reported() {
    let bytes = 0x0badf00du32.to_le_bytes();
    assert_eq!(
        Registry::global().decode_bytes(&bytes).unwrap_err(),
        Error::UnknownConstructor { id: 0x0badf00d }
    );
}

#[test]
fn builder_rejects_duplicate_tags() {
    let mut builder = Registry::builder();
    builder
        .register(Entry { id: 0xd07504a5, name: "photo", factory: make::<boxed::Photo, 0xd07504a5> })
        .unwrap();
    let err = builder
        .register(Entry {
            id: 0xd07504a5,
            name: "emojiStatus",
            factory: make::<boxed::EmojiStatus, 0x929b619d>,
        })
        .unwrap_err();
    assert_eq!(
        err,
        RegistryError::DuplicateConstructor { id: 0xd07504a5, existing: "photo", new: "emojiStatus" }
    );
}

#[test]
fn hand_built_registry_only_knows_its_entries() {
    let mut builder = Registry::builder();
    builder
        .extend(&[Entry { id: 0x2331b22d, name: "photoEmpty", factory: make::<boxed::Photo, 0x2331b22d> }])
        .unwrap();
    let registry = builder.build();
    assert_eq!(registry.len(), 1);
    assert!(!registry.contains(0xfb197a65));

    let mut photo = boxed::Photo::default();
    photo.to_photo_empty().set_id(3);
    let bytes = photo.encode(EncodeContext::strict(LAYER)).unwrap();
    let object = registry.decode_bytes(&bytes).unwrap();
    assert_eq!(object.downcast_ref::<boxed::Photo>(), Some(&photo));
}

#[test]
fn global_is_shared_across_threads() {
    let addr = Registry::global() as *const Registry as usize;
    let handles: Vec<_> = (0..4)
        .map(|_| {
            thread::spawn(|| {
                let registry = Registry::global();
                assert!(registry.contains(0xa40e7d5e));
                registry as *const Registry as usize
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), addr);
    }
}

#[cfg(feature = "name-for-id")]
#[test]
fn generated_name_lookup_matches_registry() {
    assert_eq!(tlcodec_types::name_for_id(0xa40e7d5e), Some("chatInviteAlready"));
    assert_eq!(tlcodec_types::name_for_id(0x0badf00d), None);
}

#[test]
fn factories_build_the_variant_their_tag_names() {
    let registry = Registry::global();
    for entry in registry.entries() {
        let object = (entry.factory)();
        assert_eq!(object.constructor_id(), entry.id, "{}", entry.name);
        assert_eq!(object.predicate_name(), entry.name);
    }

    let object = (registry.resolve(0xdb75d1a7).unwrap())();
    let invite = object.downcast_ref::<boxed::ChatInviteExt>().unwrap();
    assert_eq!(invite.identity().predicate(), Some("chatInvite"));
}

#[test]
fn factory_output_encodes_in_strict_mode() {
    let object = (Registry::global().resolve(0xace3e26e).unwrap())();
    let bytes = object.encode(EncodeContext::strict(LAYER)).unwrap();
    assert_eq!(bytes[..4], 0xace3e26eu32.to_le_bytes());

    let old = (Registry::global().resolve(0xd07504a5).unwrap())();
    assert_eq!(old.predicate_name(), "photo");
    assert_eq!(old.encode(EncodeContext::strict(115)).unwrap()[..4], 0xd07504a5u32.to_le_bytes());
}
