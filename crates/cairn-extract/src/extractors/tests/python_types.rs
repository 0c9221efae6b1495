use rstest::rstest;

use pretty_assertions::assert_eq;

use super::*;

fn python_targets(params: &[(&str, Option<&str>)], ret: Option<&str>) -> Vec<String> {
    let parsed = ParseResult {
        file_path: "app/service.py".into(),
        language: "python".into(),
        symbols: vec![function("handle", params, ret)],
        ..ParseResult::default()
    };
    targets(
        &python::extractor().extract(&parsed),
        RelationshipType::UsesType,
    )
}

#[rstest]
#[case("User", Some("User"))]
#[case("Optional[User]", Some("User"))]
#[case("typing.Optional[User]", Some("User"))]
#[case("List[Order]", Some("Order"))]
#[case("list[Order]", Some("Order"))]
#[case("Dict[UserId, User]", Some("UserId"))]
#[case("Dict[str, User]", None)]
#[case("Union[None, Invoice]", Some("Invoice"))]
#[case("Invoice | None", Some("Invoice"))]
#[case("Optional[List[Order]]", Some("Order"))]
#[case("\"User\"", Some("User"))]
#[case("Repository[User]", Some("Repository"))]
#[case("int", None)]
#[case("str", None)]
#[case("Any", None)]
#[case("typing.Any", None)]
#[case("None", None)]
#[case("Callable[[int], User]", None)]
fn annotation_normalization(#[case] annotation: &str, #[case] expected: Option<&str>) {
    assert_eq!(
        python_targets(&[("x", Some(annotation))], None),
        expected.map(String::from).into_iter().collect::<Vec<_>>()
    );
}

#[test]
fn self_parameter_without_annotation_is_ignored() {
    assert_eq!(
        python_targets(&[("self", None), ("order", Some("Order"))], Some("Receipt")),
        vec!["Order", "Receipt"]
    );
}

#[test]
fn primitive_return_is_excluded() {
    assert!(python_targets(&[], Some("bool")).is_empty());
}
