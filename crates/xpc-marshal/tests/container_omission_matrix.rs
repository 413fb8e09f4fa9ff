use xpc_marshal::memory::{shared_codec, Object};
use xpc_marshal::{Map, Value};

fn encode(value: &Value) -> Object {
    shared_codec().encode(value).expect("encode")
}

fn decode(object: &Object) -> Value {
    shared_codec()
        .decode(object)
        .expect("decode")
        .expect("container missed")
}

fn sample_array(len: usize) -> Value {
    Value::Array((0..len as i64).map(Value::Int64).collect())
}

fn sample_map(len: usize) -> Value {
    Value::Map(
        (0..len)
            .map(|i| (format!("k{i}"), Value::UInt64(i as u64)))
            .collect::<Map>(),
    )
}

#[test]
fn array_omits_corrupted_elements() {
    for corrupted in [0usize, 1, 3, 5] {
        let mut object = encode(&sample_array(5));
        if let Object::Array(items) = &mut object {
            for item in items.iter_mut().take(corrupted) {
                *item = Object::raw_string(b"\xff\xfe\xfd");
            }
        }
        let back = decode(&object);
        assert_eq!(back.as_array().unwrap().len(), 5 - corrupted);
    }
}

#[test]
fn omission_shifts_later_indices() {
    let mut object = encode(&Value::Array(vec![
        Value::Int64(10),
        Value::Int64(20),
        Value::Int64(30),
    ]));
    if let Object::Array(items) = &mut object {
        items[1] = Object::null_data();
    }
    let back = decode(&object);
    let items = back.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0].as_i64(), Some(10));
    assert_eq!(items[1].as_i64(), Some(30));
}

#[test]
fn map_omits_entries_with_missing_values() {
    for corrupted in [0usize, 1, 2, 4] {
        let mut object = encode(&sample_map(4));
        for i in 0..corrupted {
            object.insert_raw(format!("k{i}").as_bytes(), Object::null_data());
        }
        let back = decode(&object);
        let entries = back.as_map().unwrap();
        assert_eq!(entries.len(), 4 - corrupted);
        for i in corrupted..4 {
            assert_eq!(entries[&format!("k{i}")].as_u64(), Some(i as u64));
        }
    }
}

#[test]
fn map_drops_entry_with_invalid_utf8_key() {
    let mut object = encode(&sample_map(2));
    object.insert_raw(b"bad\xc3\x28key", Object::Int64(1));
    assert_eq!(object.len(), 3);
    let back = decode(&object);
    let entries = back.as_map().unwrap();
    assert_eq!(entries.len(), 2);
    assert!(entries.contains_key("k0"));
    assert!(entries.contains_key("k1"));
}

#[test]
fn nested_miss_only_drops_the_inner_element() {
    let mut object = encode(&Value::Array(vec![
        Value::Array(vec![Value::Int64(1), Value::Int64(2)]),
        Value::Int64(3),
    ]));
    if let Object::Array(outer) = &mut object {
        if let Object::Array(inner) = &mut outer[0] {
            inner[0] = Object::raw_string(b"\x80");
        }
    }
    let back = decode(&object);
    let outer = back.as_array().unwrap();
    assert_eq!(outer.len(), 2);
    assert_eq!(outer[0].as_array().unwrap().len(), 1);
}

#[test]
fn top_level_miss_is_absent_not_error() {
    assert!(shared_codec()
        .decode(&Object::raw_string(b"\xff"))
        .unwrap()
        .is_none());
    assert!(shared_codec().decode(&Object::null_data()).unwrap().is_none());
}

#[test]
fn unregistered_tag_inside_map_is_a_contract_violation() {
    let mut object = encode(&sample_map(2));
    object.insert_raw(b"shm", Object::Shmem(4096));
    let err = shared_codec().decode(&object).unwrap_err();
    assert!(err.is_contract_violation());
    assert!(err.to_string().contains("Shmem"));
}
