//! Tests for submission validation, mirrored record construction, and
//! transition semantics.

use chrono::NaiveDate;
use credentials::HashedPassword;
use rstest::{fixture, rstest};
use serde_json::json;

use super::*;
use crate::domain::accounts::PostalAddressParts;

fn hash(plaintext: &str) -> HashedPassword {
    HashedPassword::from_plaintext(plaintext).expect("test hashing succeeds")
}

#[fixture]
fn donor() -> Donor {
    Donor {
        name: "Ada Lovelace".into(),
        email: EmailAddress::parse("ada@example.org").expect("fixture email parses"),
        phone: "9876543210".into(),
        address: PostalAddressParts {
            street: "21 Baker Street".into(),
            city: "Coimbatore".into(),
            district: "Coimbatore".into(),
            state: "Tamil Nadu".into(),
            postal_code: "641001".into(),
        },
        password: hash("s3cret!pass"),
        reset_grant: None,
    }
}

#[fixture]
fn organization() -> Organization {
    Organization {
        organization_name: "Helping Hands".into(),
        registration_id: "NGO-2291".into(),
        owner_name: "Grace Hopper".into(),
        email: EmailAddress::parse("contact@helpinghands.example").expect("fixture email parses"),
        phone: "9123456780".into(),
        address: PostalAddressParts {
            street: "4 Relief Road".into(),
            city: "Chennai".into(),
            district: "Chennai".into(),
            state: "Tamil Nadu".into(),
            postal_code: "600001".into(),
        },
        password: hash("f33d&share"),
        reset_grant: None,
    }
}

#[fixture]
fn submission() -> DonationSubmission {
    DonationSubmission {
        organization_name: "Helping Hands".into(),
        category: DonationCategory::Food,
        items: vec!["Rice".into(), "Dal".into()],
        quantities: vec![3, 1],
    }
}

#[rstest]
fn order_ids_are_compact_uuids() {
    let id = OrderId::generate();
    assert_eq!(id.as_str().len(), 32);
    assert!(id.as_str().chars().all(|c| c.is_ascii_hexdigit()));
    assert_ne!(id, OrderId::generate());
}

#[rstest]
fn validate_zips_items_with_quantities(submission: DonationSubmission) {
    let validated = submission.validate().expect("submission is valid");
    assert_eq!(
        validated.items,
        vec![
            DonationItem {
                name: "Rice".into(),
                quantity: 3,
            },
            DonationItem {
                name: "Dal".into(),
                quantity: 1,
            },
        ],
    );
}

#[rstest]
fn validate_trims_names(mut submission: DonationSubmission) {
    submission.organization_name = "  Helping Hands ".into();
    submission.items[0] = " Rice ".into();
    let validated = submission.validate().expect("submission is valid");
    assert_eq!(validated.organization_name, "Helping Hands");
    assert_eq!(validated.items[0].name, "Rice");
}

#[rstest]
fn validate_rejects_empty_item_list(mut submission: DonationSubmission) {
    submission.items.clear();
    submission.quantities.clear();
    assert_eq!(
        submission.validate().err(),
        Some(SubmissionValidationError::NoItems),
    );
}

#[rstest]
fn validate_rejects_mismatched_lists(mut submission: DonationSubmission) {
    submission.quantities.pop();
    assert_eq!(
        submission.validate().err(),
        Some(SubmissionValidationError::MismatchedQuantities {
            items: 2,
            quantities: 1,
        }),
    );
}

#[rstest]
fn validate_rejects_blank_items(mut submission: DonationSubmission) {
    submission.items[1] = "   ".into();
    assert_eq!(
        submission.validate().err(),
        Some(SubmissionValidationError::BlankItem { index: 1 }),
    );
}

#[rstest]
fn validate_rejects_zero_quantity(mut submission: DonationSubmission) {
    submission.quantities[0] = 0;
    assert_eq!(
        submission.validate().err(),
        Some(SubmissionValidationError::ZeroQuantity {
            item: "Rice".into(),
        }),
    );
}

#[rstest]
fn submit_builds_matching_copies(
    donor: Donor,
    organization: Organization,
    submission: DonationSubmission,
) {
    let validated = submission.validate().expect("submission is valid");
    let order_id = OrderId::generate();
    let mirrored = MirroredDonation::submit(
        &donor,
        &organization,
        validated,
        order_id.clone(),
        "9/14/2025".to_owned(),
    );

    assert_eq!(mirrored.order_id(), &order_id);
    assert_eq!(mirrored.donor_copy.core, mirrored.organization_copy.core);
    assert_eq!(mirrored.donor_copy.core.status, DonationStatus::Pending);
    assert!(mirrored.donor_copy.core.pickup_time.is_none());

    assert_eq!(mirrored.donor_copy.organization_name, "Helping Hands");
    assert_eq!(mirrored.donor_copy.organization_phone, "9123456780");
    assert_eq!(
        mirrored.donor_copy.address.display_line(),
        "21 Baker Street/Coimbatore/Coimbatore/Tamil Nadu/641001",
    );

    assert_eq!(mirrored.organization_copy.donor_name, "Ada Lovelace");
    assert_eq!(mirrored.organization_copy.donor_phone, "9876543210");
    assert_eq!(
        mirrored.organization_copy.donor_email.as_str(),
        "ada@example.org",
    );
    assert_eq!(
        mirrored.organization_copy.donor_address,
        mirrored.donor_copy.address,
    );

    assert_eq!(mirrored.donor_email, donor.email);
    assert_eq!(mirrored.organization_email, organization.email);
}

#[rstest]
fn donor_record_serialises_with_flattened_core(
    donor: Donor,
    organization: Organization,
    submission: DonationSubmission,
) {
    let validated = submission.validate().expect("submission is valid");
    let mirrored = MirroredDonation::submit(
        &donor,
        &organization,
        validated,
        OrderId::from_stored("a".repeat(32)),
        "9/14/2025".to_owned(),
    );

    let encoded = serde_json::to_value(&mirrored.donor_copy).expect("serialisation succeeds");
    assert_eq!(encoded["orderId"], json!("a".repeat(32)));
    assert_eq!(encoded["date"], json!("9/14/2025"));
    assert_eq!(encoded["status"], json!("Pending"));
    assert_eq!(encoded["organizationName"], json!("Helping Hands"));
    assert_eq!(encoded["items"][0], json!({"name": "Rice", "quantity": 3}));
    assert!(encoded.get("pickupTime").is_none());
}

#[rstest]
fn accept_requires_a_pickup_time() {
    assert_eq!(
        DonationTransition::accept("  ").err(),
        Some(TransitionValidationError::MissingPickupTime),
    );
}

#[rstest]
fn accept_carries_the_trimmed_pickup_time() {
    let transition = DonationTransition::accept(" 10:30 AM ").expect("pickup time is non-blank");
    assert_eq!(transition.target_status(), DonationStatus::Accepted);
    assert_eq!(transition.pickup_time(), Some("10:30 AM"));
}

#[rstest]
#[case(DonationTransition::Reject, DonationStatus::Rejected)]
#[case(DonationTransition::Collect, DonationStatus::Collected)]
fn bare_transitions_set_status_only(
    #[case] transition: DonationTransition,
    #[case] expected: DonationStatus,
) {
    assert_eq!(transition.target_status(), expected);
    assert_eq!(transition.pickup_time(), None);
}

#[rstest]
#[case(DonationFilter::Pending, DonationStatus::Pending, true)]
#[case(DonationFilter::Pending, DonationStatus::Accepted, false)]
#[case(DonationFilter::Settled, DonationStatus::Pending, false)]
#[case(DonationFilter::Settled, DonationStatus::Accepted, true)]
#[case(DonationFilter::Settled, DonationStatus::Rejected, true)]
#[case(DonationFilter::Settled, DonationStatus::Collected, true)]
fn filter_matches_statuses(
    #[case] filter: DonationFilter,
    #[case] status: DonationStatus,
    #[case] expected: bool,
) {
    assert_eq!(filter.matches(status), expected);
}

#[rstest]
fn filter_defaults_to_pending() {
    assert_eq!(DonationFilter::default(), DonationFilter::Pending);
}

#[rstest]
fn filter_deserialises_lowercase_names() {
    let filter: DonationFilter =
        serde_json::from_str("\"settled\"").expect("deserialisation succeeds");
    assert_eq!(filter, DonationFilter::Settled);
}

#[rstest]
#[case(2025, 9, 14, "9/14/2025")]
#[case(2025, 12, 3, "12/3/2025")]
#[case(2026, 1, 31, "1/31/2026")]
fn wire_dates_carry_no_zero_padding(
    #[case] year: i32,
    #[case] month: u32,
    #[case] day: u32,
    #[case] expected: &str,
) {
    let date = NaiveDate::from_ymd_opt(year, month, day).expect("test date is valid");
    assert_eq!(wire_date::format(date), expected);
}
