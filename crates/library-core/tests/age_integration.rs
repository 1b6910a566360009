//! Integration tests for the registered module and the `age_days` field.

use std::collections::HashSet;
use std::io::Write;

use chrono::NaiveDate;
use library_core::computed::{apply_inverse, compute, compute_age, date_for_age};
use library_core::models::{sort_default, AGE_DAYS, RELEASE_DATE};
use library_core::query::extract_filter_fields;
use library_core::proto::{CompareOp, FilterExpr, SimpleFilter, Value};
use library_core::{
    Book, BookState, Clock, Error, FieldAccess, FilterEvaluator, FixedClock, LibraryModule,
    ModuleManifest, PartnerBooks, SecurityContext,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn shelf() -> Vec<Book> {
    vec![
        Book::new(1, "Dune", "dune")
            .released_on(date(2024, 5, 1))
            .in_state(BookState::Available)
            .published_by(10)
            .written_by(20),
        Book::new(2, "Emma", "emma")
            .released_on(date(2024, 5, 27))
            .published_by(10),
        Book::new(3, "Ulysses", "ulysses")
            .released_on(date(2024, 6, 1))
            .written_by(20)
            .written_by(21),
        Book::new(4, "Preorder", "preorder").released_on(date(2024, 6, 11)),
        Book::new(5, "Beloved", "beloved").released_on(date(1987, 9, 2)),
    ]
}

#[test]
fn test_age_round_trip_through_inverse() {
    let clock = FixedClock(date(2024, 6, 1));
    let mut books = vec![Book::new(1, "Dune", "dune").released_on(date(2024, 5, 1))];

    compute(&mut books, clock.today());
    assert_eq!(books[0].age_days, 31.0);

    books[0].set(AGE_DAYS, Value::Int32(31)).unwrap();
    books[0].release_date = Some(date(1999, 1, 1));
    assert_eq!(apply_inverse(&mut books, clock.today()).unwrap(), 1);
    assert_eq!(books[0].release_date, Some(date(2024, 5, 1)));

    compute(&mut books, clock.today());
    assert_eq!(books[0].age_days, 31.0);
}

#[test]
fn test_inverse_then_compute_is_identity_on_whole_days() {
    let today = date(2024, 6, 1);
    for age in [-400, -1, 0, 1, 31, 366, 20_000] {
        let release = date_for_age(f64::from(age), today).unwrap();
        assert_eq!(compute_age(Some(release), today), f64::from(age), "age {age}");
    }
}

#[test]
fn test_rewritten_search_matches_computed_values() {
    let today = date(2024, 6, 1);
    let module = LibraryModule::register().unwrap();
    let rewriter = module.book_rewriter(today).unwrap();

    let mut books = shelf();
    module.hooks.compute_all(&mut books, today);

    let ops = [
        CompareOp::Eq,
        CompareOp::Ne,
        CompareOp::Lt,
        CompareOp::Le,
        CompareOp::Gt,
        CompareOp::Ge,
    ];
    for op in ops {
        for threshold in [-10.0, -1.0, -0.5, 0.0, 5.0, 5.5, 31.0, 36_000.0] {
            let on_age = FilterExpr::compare(AGE_DAYS, op, threshold);
            let on_date = rewriter.rewrite(&on_age).unwrap();
            assert_eq!(
                extract_filter_fields(&on_date),
                HashSet::from([RELEASE_DATE.to_string()])
            );

            for book in &books {
                let row = book.row();
                assert_eq!(
                    FilterEvaluator::evaluate(&on_age, &row).unwrap(),
                    FilterEvaluator::evaluate(&on_date, &row).unwrap(),
                    "book {} with age {} {op} {threshold}",
                    book.id,
                    book.age_days
                );
            }
        }
    }
}

#[test]
fn test_undated_book_never_matches_rewritten_search() {
    let today = date(2024, 6, 1);
    let module = LibraryModule::register().unwrap();
    let rewriter = module.book_rewriter(today).unwrap();

    let mut books = vec![Book::new(9, "Undated", "undated")];
    module.hooks.compute_all(&mut books, today);
    assert_eq!(books[0].age_days, 0.0);

    let rewritten = rewriter
        .rewrite(&FilterExpr::compare(AGE_DAYS, CompareOp::Eq, 0i32))
        .unwrap();
    assert!(!FilterEvaluator::evaluate(&rewritten, &books[0].row()).unwrap());
}

#[test]
fn test_inverse_error_leaves_books_untouched() {
    let today = date(2024, 6, 1);
    let mut books = shelf();
    let before: Vec<_> = books.iter().map(|b| b.release_date).collect();
    books[0].age_days = 10.0;
    books[3].age_days = f64::INFINITY;

    assert!(apply_inverse(&mut books, today).is_err());
    let after: Vec<_> = books.iter().map(|b| b.release_date).collect();
    assert_eq!(before, after);
}

#[test]
fn test_unknown_operator_passes_through_rewrite() {
    let today = date(2024, 6, 1);
    let module = LibraryModule::register().unwrap();
    let rewriter = module.book_rewriter(today).unwrap();

    let rewritten = rewriter
        .rewrite(&FilterExpr::condition(AGE_DAYS, "not ilike", 31i32))
        .unwrap();
    assert_eq!(rewritten.to_string(), "release_date not ilike 2024-05-01");
}

#[test]
fn test_search_combined_with_stored_fields() {
    let today = date(2024, 6, 1);
    let module = LibraryModule::register().unwrap();
    let rewriter = module.book_rewriter(today).unwrap();

    let filter = FilterExpr::and(vec![
        SimpleFilter::compare(AGE_DAYS, CompareOp::Gt, 5i32),
        SimpleFilter::compare("publisher_id", CompareOp::Eq, Value::Id(10)),
    ]);
    let rewritten = rewriter.rewrite(&filter).unwrap();

    let mut matched: Vec<i64> = shelf()
        .iter()
        .filter(|b| FilterEvaluator::evaluate(&rewritten, &b.row()).unwrap())
        .map(|b| b.id)
        .collect();
    matched.sort_unstable();
    assert_eq!(matched, vec![1]);
}

#[test]
fn test_default_order_and_partner_books() {
    let mut books = shelf();
    books.push(Book::new(6, "Undated", "undated"));
    sort_default(&mut books);

    let ids: Vec<i64> = books.iter().map(|b| b.id).collect();
    assert_eq!(ids, vec![6, 4, 3, 2, 1, 5]);

    let partner = PartnerBooks::collect(20, &books);
    assert!(partner.published_book_ids.is_empty());
    assert_eq!(partner.authored_book_ids.len(), 2);
    assert!(PartnerBooks::collect(99, &books).is_empty());
}

#[test]
fn test_field_access_on_registered_schema() {
    let module = LibraryModule::register().unwrap();
    let entity = module.book_entity().unwrap();
    let guest = SecurityContext::new(5);

    let mut row = shelf()[0].row();
    assert_eq!(FieldAccess::mask_row(entity, &mut row, &guest), 1);

    let lost = Some(BookState::Lost.key());
    let member = SecurityContext::new(2).with_group("base.group_user");
    assert!(matches!(
        FieldAccess::check_write(entity, "page", lost, &member),
        Err(Error::ReadOnlyField { .. })
    ));
}

#[test]
fn test_manifest_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    let json = ModuleManifest::library_management().to_json().unwrap();
    file.write_all(json.as_bytes()).unwrap();

    let manifest = ModuleManifest::load(file.path()).unwrap();
    assert_eq!(manifest, ModuleManifest::library_management());

    let module = LibraryModule::with_manifest(manifest).unwrap();
    assert_eq!(module.manifest.data.len(), 4);
}

#[test]
fn test_manifest_load_rejects_invalid() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"{"name": "", "version": "1.0", "depends": ["base"]}"#)
        .unwrap();

    assert!(matches!(
        ModuleManifest::load(file.path()),
        Err(Error::Manifest(_))
    ));
    assert!(matches!(
        ModuleManifest::load("/nonexistent/__manifest__.json"),
        Err(Error::Io(_))
    ));
}

#[test]
fn test_schema_json_for_host() {
    let module = LibraryModule::register().unwrap();
    let json = module.schema.to_json().unwrap();

    assert!(json.contains("\"age_days\""));
    assert!(json.contains("library_book_res_partner_rel"));
}
