//! Tests for the listing services.

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};

use super::*;
use crate::domain::ports::{MockListingRepository, MockReviewRepository};
use crate::domain::{
    ErrorCode, FlashBuffer, FlashKind, ListingSort, ScoredListing, TagCount, UserId,
};

struct FixtureClock {
    utc_now: DateTime<Utc>,
}

impl Clock for FixtureClock {
    fn local(&self) -> DateTime<Local> {
        self.utc_now.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.utc_now
    }
}

fn fixture_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 14, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp")
}

#[fixture]
fn host() -> UserId {
    UserId::new("123e4567-e89b-12d3-a456-426614174000").expect("fixture id")
}

fn listing(name: &str, slug: &str, author: UserId) -> Listing {
    Listing::from_draft(
        ListingIdentity {
            id: ListingId::random(),
            slug: slug.to_owned(),
            author,
            created: fixture_timestamp(),
        },
        &ListingDraft {
            name: name.to_owned(),
            description: "Sea views".to_owned(),
            tags: vec!["Wifi".to_owned()],
            location: "1 Shore Road".to_owned(),
            photo: None,
        },
    )
}

fn scored(listings: &[Listing]) -> Vec<ScoredListing> {
    listings.iter().cloned().map(ScoredListing::unscored).collect()
}

fn service(
    listings: MockListingRepository,
    reviews: MockReviewRepository,
) -> ListingsService<MockListingRepository, MockReviewRepository> {
    ListingsService::new(
        Arc::new(listings),
        Arc::new(reviews),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
        ListingsSettings::default(),
    )
}

fn browse_repo(returned: Vec<Listing>, total: u64) -> MockListingRepository {
    let mut repo = MockListingRepository::new();
    let rows = scored(&returned);
    repo.expect_execute()
        .times(1)
        .returning(move |_| Ok(rows.clone()));
    repo.expect_count()
        .withf(|filter| *filter == ListingFilter::All)
        .times(1)
        .returning(move |_| Ok(total));
    repo
}

#[rstest]
#[tokio::test]
async fn browse_second_page_returns_remaining_record(host: UserId) {
    let mut repo = MockListingRepository::new();
    let last = listing("Last", "last", host);
    let rows = scored(&[last.clone()]);
    repo.expect_execute()
        .withf(|query| query.skip() == 6 && query.limit() == Some(6))
        .times(1)
        .returning(move |_| Ok(rows.clone()));
    repo.expect_count().times(1).returning(|_| Ok(7));
    let flashes = FlashBuffer::new();

    let outcome = service(repo, MockReviewRepository::new())
        .browse(Some("2"), &flashes)
        .await
        .expect("browse succeeds");

    let BrowseOutcome::Page(page) = outcome else {
        panic!("expected a page, got {outcome:?}");
    };
    assert_eq!(page.pages(), 2);
    assert_eq!(page.count(), 7);
    assert_eq!(page.into_items(), [last]);
    assert!(flashes.drain().is_empty());
}

#[rstest]
#[tokio::test]
async fn browse_past_the_end_redirects_with_one_notice() {
    let repo = browse_repo(Vec::new(), 7);
    let flashes = FlashBuffer::new();

    let outcome = service(repo, MockReviewRepository::new())
        .browse(Some("5"), &flashes)
        .await
        .expect("browse succeeds");

    assert_eq!(
        outcome,
        BrowseOutcome::Redirect(PageNumber::new(2).expect("page"))
    );
    let notices = flashes.drain();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].kind(), FlashKind::Info);
    assert_eq!(
        notices[0].message(),
        "You asked for page 5. But that does not exist. So I put you on page 2"
    );
}

#[rstest]
#[case(None)]
#[case(Some("abc"))]
#[case(Some("0"))]
#[case(Some("-4"))]
#[tokio::test]
async fn browse_empty_store_renders_empty_first_page(#[case] raw: Option<&'static str>) {
    let repo = browse_repo(Vec::new(), 0);
    let flashes = FlashBuffer::new();

    let outcome = service(repo, MockReviewRepository::new())
        .browse(raw, &flashes)
        .await
        .expect("browse succeeds");

    let BrowseOutcome::Page(page) = outcome else {
        panic!("empty store must never redirect");
    };
    assert_eq!(page.page(), PageNumber::FIRST);
    assert!(page.into_items().is_empty());
    assert!(flashes.drain().is_empty());
}

#[rstest]
#[tokio::test]
async fn browse_maps_connection_failures_to_service_unavailable() {
    let mut repo = MockListingRepository::new();
    repo.expect_execute()
        .returning(|_| Err(ListingRepositoryError::connection("refused")));
    repo.expect_count().returning(|_| Ok(0));

    let err = service(repo, MockReviewRepository::new())
        .browse(None, &FlashBuffer::new())
        .await
        .expect_err("connection failure surfaces");
    assert_eq!(err.code(), ErrorCode::ServiceUnavailable);
}

#[rstest]
#[case(None)]
#[case(Some("   "))]
#[tokio::test]
async fn search_rejects_blank_queries(#[case] q: Option<&'static str>) {
    let err = service(MockListingRepository::new(), MockReviewRepository::new())
        .search(q)
        .await
        .expect_err("blank query rejected");
    assert_eq!(err.code(), ErrorCode::InvalidRequest);
}

#[rstest]
#[tokio::test]
async fn search_runs_ranked_capped_query(host: UserId) {
    let mut repo = MockListingRepository::new();
    let rows = scored(&[listing("Beach House", "beach-house", host)]);
    repo.expect_execute()
        .withf(|query| {
            *query.filter() == ListingFilter::Text("beach".to_owned())
                && query.sort() == ListingSort::RelevanceDesc
                && query.limit() == Some(5)
        })
        .times(1)
        .returning(move |_| Ok(rows.clone()));

    let response = service(repo, MockReviewRepository::new())
        .search(Some("  beach "))
        .await
        .expect("search succeeds");
    assert_eq!(response.length, 1);
    assert_eq!(response.stays[0].slug(), "beach-house");
}

#[rstest]
#[tokio::test]
async fn search_limit_never_exceeds_five() {
    let mut repo = MockListingRepository::new();
    repo.expect_execute()
        .withf(|query| query.limit() == Some(SEARCH_LIMIT))
        .times(1)
        .returning(|_| Ok(Vec::new()));
    let service = ListingsService::new(
        Arc::new(repo),
        Arc::new(MockReviewRepository::new()),
        Arc::new(FixtureClock {
            utc_now: fixture_timestamp(),
        }),
        ListingsSettings {
            search_limit: 50,
            ..ListingsSettings::default()
        },
    );

    let response = service.search(Some("cabin")).await.expect("search succeeds");
    assert_eq!(response.length, 0);
}

#[rstest]
#[case(None, ListingFilter::All)]
#[case(Some(""), ListingFilter::All)]
#[case(Some("Wifi"), ListingFilter::Tag("Wifi".to_owned()))]
#[tokio::test]
async fn tags_sorts_counts_and_applies_optional_filter(
    #[case] tag: Option<&'static str>,
    #[case] expected: ListingFilter,
) {
    let mut repo = MockListingRepository::new();
    repo.expect_tag_counts().times(1).returning(|| {
        Ok(vec![
            TagCount::new("Wifi", 1),
            TagCount::new("Family", 3),
            TagCount::new("Beach", 1),
        ])
    });
    repo.expect_execute()
        .withf(move |query| *query.filter() == expected)
        .times(1)
        .returning(|_| Ok(Vec::new()));

    let response = service(repo, MockReviewRepository::new())
        .tags(tag)
        .await
        .expect("tags succeed");
    let order: Vec<_> = response.tags.iter().map(|t| t.tag.as_str()).collect();
    assert_eq!(order, ["Family", "Beach", "Wifi"]);
    assert_eq!(response.tag.as_deref(), tag.filter(|t| !t.is_empty()));
}

#[rstest]
#[tokio::test]
async fn create_requires_login() {
    let err = service(MockListingRepository::new(), MockReviewRepository::new())
        .create(
            RequestContext::anonymous(),
            ListingDraft::default(),
            &FlashBuffer::new(),
        )
        .await
        .expect_err("anonymous rejected");
    assert_eq!(err.code(), ErrorCode::Unauthorized);
}

#[rstest]
#[tokio::test]
async fn create_rejects_invalid_draft_with_one_notice_per_field(host: UserId) {
    let mut repo = MockListingRepository::new();
    repo.expect_insert().never();
    let flashes = FlashBuffer::new();

    let err = service(repo, MockReviewRepository::new())
        .create(
            RequestContext::for_user(host),
            ListingDraft::default(),
            &flashes,
        )
        .await
        .expect_err("invalid draft rejected");

    assert_eq!(err.code(), ErrorCode::InvalidRequest);
    let field_errors = err
        .details()
        .and_then(|d| d.get("fieldErrors"))
        .and_then(|v| v.as_array())
        .expect("field errors");
    assert_eq!(field_errors.len(), 3);
    let notices = flashes.drain();
    assert_eq!(notices.len(), 3);
    assert!(notices.iter().all(|n| n.kind() == FlashKind::Error));
}

#[rstest]
#[tokio::test]
async fn create_suffixes_colliding_slug(host: UserId) {
    let mut repo = MockListingRepository::new();
    repo.expect_slugs_with_prefix()
        .withf(|prefix| prefix == "beach-house")
        .times(1)
        .returning(|_| Ok(vec!["beach-house".to_owned()]));
    repo.expect_insert()
        .withf(|listing| listing.slug() == "beach-house-2")
        .times(1)
        .returning(|_| Ok(()));
    let flashes = FlashBuffer::new();

    let created = service(repo, MockReviewRepository::new())
        .create(
            RequestContext::for_user(host),
            ListingDraft {
                name: "Beach House".to_owned(),
                description: "Sea views".to_owned(),
                location: "1 Shore Road".to_owned(),
                ..ListingDraft::default()
            },
            &flashes,
        )
        .await
        .expect("create succeeds");

    assert_eq!(created.author(), host);
    assert_eq!(created.created(), fixture_timestamp());
    assert_eq!(
        flashes.drain(),
        vec![FlashNotice::success("Successfully Created Beach House.")]
    );
}

#[rstest]
#[tokio::test]
async fn create_maps_duplicate_slug_to_conflict(host: UserId) {
    let mut repo = MockListingRepository::new();
    repo.expect_slugs_with_prefix().returning(|_| Ok(Vec::new()));
    repo.expect_insert()
        .returning(|listing| Err(ListingRepositoryError::duplicate_slug(listing.slug())));

    let err = service(repo, MockReviewRepository::new())
        .create(
            RequestContext::for_user(host),
            ListingDraft {
                name: "Cabin".to_owned(),
                description: "Woods".to_owned(),
                location: "Forest".to_owned(),
                ..ListingDraft::default()
            },
            &FlashBuffer::new(),
        )
        .await
        .expect_err("duplicate rejected");
    assert_eq!(err.code(), ErrorCode::Conflict);
}

#[rstest]
#[tokio::test]
async fn update_by_stranger_is_forbidden_and_never_writes(host: UserId) {
    let stored = listing("Beach House", "beach-house", host);
    let id = stored.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update_owned().never();

    let err = service(repo, MockReviewRepository::new())
        .update(
            RequestContext::for_user(UserId::random()),
            id,
            ListingPatch {
                name: Some("Mine now".to_owned()),
                ..ListingPatch::default()
            },
            &FlashBuffer::new(),
        )
        .await
        .expect_err("stranger rejected");
    assert_eq!(err.code(), ErrorCode::Forbidden);
    assert_eq!(err.message(), "You must own the stay in order to edit it");
}

#[rstest]
#[tokio::test]
async fn update_by_owner_applies_normalised_patch(host: UserId) {
    let stored = listing("Beach House", "beach-house", host);
    let id = stored.id();
    let mut updated = stored.clone();
    updated.apply(&ListingPatch {
        name: Some("Beach House 2".to_owned()),
        ..ListingPatch::default()
    });
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));
    repo.expect_update_owned()
        .withf(move |target, author, patch| {
            *target == id && *author == host && patch.name.as_deref() == Some("Beach House 2")
        })
        .times(1)
        .returning(move |_, _, _| Ok(Some(updated.clone())));
    let flashes = FlashBuffer::new();

    let result = service(repo, MockReviewRepository::new())
        .update(
            RequestContext::for_user(host),
            id,
            ListingPatch {
                name: Some("  Beach House 2 ".to_owned()),
                ..ListingPatch::default()
            },
            &flashes,
        )
        .await
        .expect("update succeeds");

    assert_eq!(result.name(), "Beach House 2");
    assert_eq!(result.slug(), "beach-house");
    assert_eq!(
        flashes.drain(),
        vec![FlashNotice::success("Successfully updated Beach House 2.")]
    );
}

#[rstest]
#[tokio::test]
async fn edit_form_is_titled_after_listing(host: UserId) {
    let stored = listing("Beach House", "beach-house", host);
    let id = stored.id();
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_id()
        .returning(move |_| Ok(Some(stored.clone())));

    let form = service(repo, MockReviewRepository::new())
        .edit_form(RequestContext::for_user(host), id)
        .await
        .expect("owner sees form");
    assert_eq!(form.title, "Edit Beach House");
    assert!(form.stay.is_some());
}

#[rstest]
#[tokio::test]
async fn unknown_slug_is_not_found() {
    let mut repo = MockListingRepository::new();
    repo.expect_find_by_slug().returning(|_| Ok(None));
    let mut reviews = MockReviewRepository::new();
    reviews.expect_list_for_listing().never();

    let err = service(repo, reviews)
        .stay_by_slug("missing")
        .await
        .expect_err("unknown slug");
    assert_eq!(err.code(), ErrorCode::NotFound);
}

#[rstest]
#[tokio::test]
async fn top_stays_requests_two_review_minimum() {
    let mut reviews = MockReviewRepository::new();
    reviews
        .expect_top_listings()
        .withf(|min, limit| *min == 2 && *limit == 10)
        .times(1)
        .returning(|_, _| Ok(Vec::new()));

    let top = service(MockListingRepository::new(), reviews)
        .top_stays()
        .await
        .expect("top succeeds");
    assert!(top.is_empty());
}
