/// Tests for the app factory

use super::*;
use crate::options::AppKind;

#[test]
fn test_create_app_matches_kind() {
    for kind in AppKind::ALL {
        assert_eq!(create_app(kind).kind(), kind);
    }
}
