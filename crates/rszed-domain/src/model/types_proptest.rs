//! Property tests for the canonical tuple text forms.

use proptest::prelude::*;

use super::types::{ObjectAndRelation, RelationTuple};

proptest! {
    #[test]
    fn userset_text_form_round_trips(
        ns in "[a-z][a-z0-9_]{0,10}",
        oid in "[a-z0-9][a-z0-9_.-]{0,10}",
        rel in "[a-z][a-z0-9_]{0,10}",
    ) {
        let onr = ObjectAndRelation::new(ns, oid, rel);
        let parsed = ObjectAndRelation::parse(&onr.to_string()).unwrap();
        prop_assert_eq!(&parsed, &onr);
    }

    #[test]
    fn subject_text_form_omits_the_relation(
        ns in "[a-z][a-z0-9_]{0,10}",
        oid in "[a-z0-9][a-z0-9_.-]{0,10}",
    ) {
        let subject = ObjectAndRelation::subject(ns, oid);
        let rendered = subject.to_string();
        prop_assert!(!rendered.contains('#'));
        let parsed = ObjectAndRelation::parse(&rendered).unwrap();
        prop_assert!(parsed.is_subject());
        prop_assert_eq!(&parsed, &subject);
    }

    #[test]
    fn tuple_text_form_round_trips(
        ns in "[a-z][a-z0-9_]{0,10}",
        oid in "[a-z0-9][a-z0-9_.-]{0,10}",
        rel in "[a-z][a-z0-9_]{0,10}",
        subject_ns in "[a-z][a-z0-9_]{0,10}",
        subject_oid in "[a-z0-9][a-z0-9_.-]{0,10}",
    ) {
        let tuple = RelationTuple::new(
            ObjectAndRelation::new(ns, oid, rel),
            ObjectAndRelation::subject(subject_ns, subject_oid),
        );
        let parsed = RelationTuple::parse(&tuple.to_string()).unwrap();
        prop_assert_eq!(&parsed, &tuple);
    }

    #[test]
    fn text_without_a_namespace_is_rejected(junk in "[a-z0-9_]{1,12}") {
        prop_assert!(ObjectAndRelation::parse(&junk).is_err());
    }
}
