//! Tests for record precondition checks

use std::convert::Infallible;

use rstest::rstest;

use menutree::domain::{
    sort_records, validate, AllowAll, DomainError, FlatRecord, Identity, Materializer, MenuMode,
    TreeBuilder, TreeNode,
};

fn placed(nodes: &[TreeNode]) -> usize {
    nodes.iter().map(TreeNode::count).sum()
}

#[rstest]
#[case::duplicate_id(
    vec![FlatRecord::new(1, 0, "Home"), FlatRecord::new(1, 0, "Again")],
    DomainError::DuplicateId { id: "1".into() }
)]
#[case::self_reference(
    vec![FlatRecord::new(1, 0, "Home"), FlatRecord::new(2, 2, "Mirror")],
    DomainError::SelfReference { id: "2".into() }
)]
#[case::unsorted(
    vec![
        FlatRecord::new(1, 0, "Home"),
        FlatRecord::new(2, 1, "Profile"),
        FlatRecord::new(3, 0, "About"),
    ],
    DomainError::Unsorted { index: 2, parent_id: "0".into(), previous: "1".into() }
)]
#[case::orphan(
    vec![FlatRecord::new(1, 0, "Home"), FlatRecord::new(2, 42, "Lost")],
    DomainError::OrphanReference { index: 1, parent_id: "42".into() }
)]
#[case::parent_after_child(
    vec![
        FlatRecord::new(7, 0, "Products"),
        FlatRecord::new(9, 1, "Licenses"),
        FlatRecord::new(1, 7, "Software"),
    ],
    DomainError::ParentAfterChild { index: 1, parent_id: "1".into() }
)]
fn given_malformed_records_when_validating_then_reports_violation(
    #[case] records: Vec<FlatRecord>,
    #[case] expected: DomainError,
) {
    assert_eq!(validate(&records, &0), Err(expected));
}

#[test]
fn given_depth_first_records_when_sorted_then_validate_passes() {
    // Arrange
    let mut records = vec![
        FlatRecord::new(1, 0, "Home").with_sort_order(1),
        FlatRecord::new(2, 1, "Profile"),
        FlatRecord::new(3, 0, "About").with_sort_order(2),
    ];
    assert!(validate(&records, &0).is_err());

    // Act
    sort_records(&mut records);

    // Assert
    assert_eq!(validate(&records, &0), Ok(()));
    let names: Vec<_> = records.iter().map(|r| r.name.as_str()).collect();
    assert_eq!(names, vec!["Home", "About", "Profile"]);
}

#[test]
fn given_non_zero_root_when_validating_then_root_is_not_orphan() {
    let records = vec![FlatRecord::new(10, 5, "Section"), FlatRecord::new(11, 10, "Page")];
    assert_eq!(validate(&records, &5), Ok(()));
    assert!(matches!(
        validate(&records, &0),
        Err(DomainError::OrphanReference { index: 0, .. })
    ));
}

#[test]
fn given_violation_when_displaying_then_message_names_row() {
    let err = DomainError::OrphanReference {
        index: 3,
        parent_id: "42".into(),
    };
    assert_eq!(err.to_string(), "row 3 references unknown parent 42");
}

#[test]
fn given_child_listed_before_parent_when_validating_then_scan_would_lose_it() {
    // Arrange: grouped by parent, but Licenses (parent 1) precedes Software (id 1)
    let records = vec![
        FlatRecord::new(7, 0, "Products"),
        FlatRecord::new(9, 1, "Licenses"),
        FlatRecord::new(1, 7, "Software"),
    ];
    let scan: Materializer<Infallible> = Materializer::new(MenuMode::Native, &AllowAll, &Identity);
    let builder: TreeBuilder<Infallible> = TreeBuilder::new(MenuMode::Native, &AllowAll, &Identity);

    // Act
    let verdict = validate(&records, &0);
    let scanned = scan.materialize_tree(&records, &0).unwrap();
    let built = builder.build(&records, &0).unwrap();

    // Assert
    assert!(matches!(verdict, Err(DomainError::ParentAfterChild { index: 1, .. })));
    assert_eq!(placed(&scanned), 2);
    assert_eq!(placed(&built), 3);
}

#[rstest]
#[case::parent_sorted(vec![
    FlatRecord::new(1, 0, "Home"),
    FlatRecord::new(3, 0, "About"),
    FlatRecord::new(2, 1, "Profile"),
    FlatRecord::new(4, 3, "Team"),
    FlatRecord::new(5, 4, "Leadership"),
])]
#[case::siblings_at_each_level(vec![
    FlatRecord::new(1, 0, "Home"),
    FlatRecord::new(2, 0, "About"),
    FlatRecord::new(3, 1, "Profile"),
    FlatRecord::new(4, 2, "Team"),
    FlatRecord::new(5, 2, "Jobs"),
    FlatRecord::new(6, 3, "Avatar"),
])]
fn given_validated_records_when_building_then_scan_matches_indexed(
    #[case] records: Vec<FlatRecord>,
) {
    // Arrange
    assert_eq!(validate(&records, &0), Ok(()));
    let scan: Materializer<Infallible> = Materializer::new(MenuMode::Native, &AllowAll, &Identity);
    let builder: TreeBuilder<Infallible> = TreeBuilder::new(MenuMode::Native, &AllowAll, &Identity);

    // Act
    let scanned = scan.materialize_tree(&records, &0).unwrap();
    let built = builder.build(&records, &0).unwrap();

    // Assert
    assert_eq!(scanned, built);
    assert_eq!(placed(&built), records.len());
}
