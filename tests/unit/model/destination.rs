use super::*;

fn d(id: &str) -> Destination {
    Destination::new(id, id.to_uppercase(), "", LngLat::new(0.0, 0.0)).unwrap()
}

fn ids(list: &DestinationList) -> Vec<&str> {
    list.iter().map(|d| d.id.as_str()).collect()
}

#[test]
fn new_rejects_bad_coordinates_and_empty_id() {
    assert!(Destination::new("a", "A", "", LngLat::new(181.0, 0.0)).is_err());
    assert!(Destination::new("a", "A", "", LngLat::new(0.0, -91.0)).is_err());
    assert!(Destination::new("", "A", "", LngLat::new(0.0, 0.0)).is_err());
}

#[test]
fn from_search_assigns_distinct_uuid_ids() {
    let a = Destination::from_search("Paris", "France", LngLat::new(2.35, 48.85)).unwrap();
    let b = Destination::from_search("Paris", "France", LngLat::new(2.35, 48.85)).unwrap();
    assert_ne!(a.id, b.id);
    assert!(uuid::Uuid::parse_str(&a.id).is_ok());
}

#[test]
fn edits_return_new_lists_and_leave_original_alone() {
    let list = DestinationList::new(vec![d("a"), d("b"), d("c")]).unwrap();
    let snapshot = list.clone();

    let pushed = list.push(d("x")).unwrap();
    assert_eq!(ids(&pushed), ["a", "b", "c", "x"]);
    assert_eq!(ids(&list.remove("b")), ["a", "c"]);
    assert_eq!(ids(&list.remove("missing")), ["a", "b", "c"]);
    assert_eq!(ids(&list.move_item(0, 2)), ["b", "c", "a"]);
    assert_eq!(ids(&list.move_item(2, 0)), ["c", "a", "b"]);
    assert_eq!(ids(&list.move_item(0, 9)), ["a", "b", "c"]);

    assert_eq!(list, snapshot);
}

#[test]
fn duplicate_ids_are_rejected() {
    let list = DestinationList::new(vec![d("a")]).unwrap();
    assert!(list.push(d("a")).is_err());
}

#[test]
fn serializes_as_plain_array() {
    let list = DestinationList::new(vec![d("a")]).unwrap();
    let v = serde_json::to_value(&list).unwrap();
    assert_eq!(v[0]["id"], "a");
    assert_eq!(v[0]["lng"], 0.0);
    let back: DestinationList = serde_json::from_value(v).unwrap();
    assert_eq!(back, list);
}
