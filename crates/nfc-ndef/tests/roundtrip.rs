use nfc_ndef::{
    NdefError, NdefMessage, NdefRecord, Tnf, TextEncoding, UriAbbreviation, create_text_record,
    create_uri_record, extract_text, message::split_into_chunks, resolve_uri,
};
use proptest::prelude::*;

fn arb_tnf() -> impl Strategy<Value = Tnf> {
    prop_oneof![
        Just(Tnf::WellKnown),
        Just(Tnf::Mime),
        Just(Tnf::AbsoluteUri),
        Just(Tnf::External),
        Just(Tnf::Unknown),
    ]
}

prop_compose! {
    fn arb_record()(
        tnf in arb_tnf(),
        type_ in proptest::collection::vec(any::<u8>(), 1..16),
        id in proptest::option::of(proptest::collection::vec(any::<u8>(), 0..8)),
        payload in proptest::collection::vec(any::<u8>(), 0..600),
    ) -> NdefRecord {
        let type_ = if tnf == Tnf::Unknown { Vec::new() } else { type_ };
        NdefRecord::new(tnf, type_, id.map(Into::into), payload).unwrap()
    }
}

proptest! {
    #[test]
    fn record_round_trip(record in arb_record()) {
        let bytes = record.encode();
        prop_assert_eq!(bytes.len(), record.encoded_len());
        prop_assert_eq!(NdefRecord::decode(&bytes).unwrap(), record);
    }

    #[test]
    fn short_record_flag_follows_payload_length(record in arb_record()) {
        let bytes = record.encode();
        let short = bytes[0] & 0x10 != 0;

        prop_assert_eq!(short, record.payload().len() <= 255);
        prop_assert_eq!(record.flags().short_record, short);
    }

    #[test]
    fn truncated_record_is_invalid(record in arb_record(), cut in 1_usize..64) {
        let bytes = record.encode();
        let cut = cut.min(bytes.len());

        let result = NdefRecord::decode(&bytes[..bytes.len() - cut]);
        prop_assert!(matches!(result, Err(NdefError::InvalidFormat(_))));
    }

    #[test]
    fn message_round_trip(records in proptest::collection::vec(arb_record(), 1..6)) {
        let message = NdefMessage::new(records.clone()).unwrap();
        let bytes = message.serialize().unwrap();
        let decoded = NdefMessage::deserialize(&bytes).unwrap();

        prop_assert_eq!(&decoded, &message);
        prop_assert_eq!(decoded.record_count(), records.len());

        let last = records.len() - 1;
        for (index, record) in decoded.iter().enumerate() {
            prop_assert_eq!(record.flags().message_begin, index == 0);
            prop_assert_eq!(record.flags().message_end, index == last);
        }

        prop_assert_eq!(decoded.serialize().unwrap(), bytes);
    }

    #[test]
    fn pushed_message_round_trip(records in proptest::collection::vec(arb_record(), 1..6)) {
        let mut records = records.into_iter();
        let mut message = NdefMessage::from(records.next().unwrap());
        for record in records {
            message.push(record);
        }

        let decoded = NdefMessage::deserialize(&message.serialize().unwrap()).unwrap();
        prop_assert_eq!(decoded, message);
    }

    #[test]
    fn chunked_record_round_trip(record in arb_record(), chunk_size in 1_usize..128) {
        let chunks = split_into_chunks(&record, chunk_size).unwrap();
        let bytes = NdefMessage::new(chunks).unwrap().serialize().unwrap();

        let decoded = NdefMessage::deserialize(&bytes).unwrap();
        prop_assert_eq!(decoded, NdefMessage::from(record));
    }

    #[test]
    fn text_round_trip(
        text in ".{0,64}",
        language in "[a-z]{2}(-[A-Z]{2})?",
        utf16 in any::<bool>(),
    ) {
        let encoding = if utf16 { TextEncoding::Utf16 } else { TextEncoding::Utf8 };
        let record = create_text_record(&text, &language, encoding).unwrap();
        let extracted = extract_text(&record).unwrap();

        prop_assert_eq!(extracted.text, text);
        prop_assert_eq!(extracted.language, language);
        prop_assert_eq!(extracted.encoding, encoding);
    }

    #[test]
    fn uri_round_trip(uri in "(https?://(www\\.)?|tel:|mailto:|urn:epc:(id|tag):|)[a-z0-9./]{0,32}") {
        let record = create_uri_record(&uri, UriAbbreviation::Auto).unwrap();
        prop_assert_eq!(resolve_uri(&record).unwrap(), uri);
    }

    #[test]
    fn arbitrary_bytes_never_panic(bytes in proptest::collection::vec(any::<u8>(), 0..256)) {
        let _ = NdefMessage::deserialize(&bytes);
        let _ = NdefRecord::decode(&bytes);
    }
}
