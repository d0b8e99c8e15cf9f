use super::*;
use crate::value::KwArgs;
use pretty_assertions::assert_eq;

fn call_method(receiver: &Value, name: &str, args: &[Value]) -> RtResult {
    receiver.get_attr(name)?.call(args, &KwArgs::default())
}

fn ints(values: &[i64]) -> Value {
    Value::list(values.iter().copied().map(Value::Integer).collect())
}

mod strings {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn size_counts_code_points() {
        assert_eq!(
            call_method(&Value::string("héllo"), "size", &[]),
            Ok(Value::Integer(5))
        );
    }

    #[test]
    fn case_conversion() {
        let s = Value::string("MiXed");
        assert_eq!(call_method(&s, "upper", &[]), Ok(Value::string("MIXED")));
        assert_eq!(call_method(&s, "lower", &[]), Ok(Value::string("mixed")));
    }

    #[test]
    fn prefix_suffix_contains() {
        let s = Value::string("goblin.rs");
        let arg = |a: &str| [Value::string(a)];
        assert_eq!(call_method(&s, "has_prefix", &arg("gob")), Ok(Value::Bool(true)));
        assert_eq!(call_method(&s, "has_suffix", &arg(".go")), Ok(Value::Bool(false)));
        assert_eq!(call_method(&s, "contains", &arg("lin")), Ok(Value::Bool(true)));
    }

    #[test]
    fn trim_with_cutset() {
        assert_eq!(
            call_method(&Value::string("xxhixyx"), "trim", &[Value::string("xy")]),
            Ok(Value::string("hi"))
        );
        assert_eq!(
            call_method(&Value::string("  hi \n"), "trim_space", &[]),
            Ok(Value::string("hi"))
        );
    }

    #[test]
    fn argument_errors() {
        let s = Value::string("abc");
        assert_eq!(
            call_method(&s, "has_prefix", &[]).unwrap_err().to_string(),
            "has_prefix() takes exactly 1 argument, got 0"
        );
        assert_eq!(
            call_method(&s, "has_suffix", &[Value::Integer(1)])
                .unwrap_err()
                .to_string(),
            "has_suffix() argument must be a string, got Integer"
        );
        assert_eq!(
            call_method(&s, "upper", &[Value::Integer(1)])
                .unwrap_err()
                .to_string(),
            "upper() takes exactly 0 arguments, got 1"
        );
    }
}

mod lists {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn push_is_visible_through_aliases() {
        let list = ints(&[1, 2]);
        let alias = list.clone();

        let returned = call_method(&list, "push", &[Value::Integer(3)]).unwrap();
        assert_eq!(alias, ints(&[1, 2, 3]));
        assert_eq!(returned, ints(&[1, 2, 3]));

        // The returned value is the same list, not a copy.
        call_method(&returned, "push", &[Value::Integer(4)]).unwrap();
        assert_eq!(list, ints(&[1, 2, 3, 4]));
    }

    #[test]
    fn pop_mutates_shared_storage() {
        let list = ints(&[1, 2]);
        let alias = list.clone();

        assert_eq!(call_method(&list, "pop", &[]), Ok(Value::Integer(2)));
        assert_eq!(call_method(&alias, "size", &[]), Ok(Value::Integer(1)));
        assert_eq!(call_method(&alias, "pop", &[]), Ok(Value::Integer(1)));
        assert_eq!(
            call_method(&list, "pop", &[]).unwrap_err().to_string(),
            "pop() called on empty list"
        );
    }

    #[test]
    fn first_and_last() {
        let list = ints(&[7, 8, 9]);
        assert_eq!(call_method(&list, "first", &[]), Ok(Value::Integer(7)));
        assert_eq!(call_method(&list, "last", &[]), Ok(Value::Integer(9)));
        assert!(call_method(&ints(&[]), "first", &[]).is_err());
    }

    #[test]
    fn join_uses_display_form() {
        let list = Value::list(vec![
            Value::Integer(1),
            Value::string("a"),
            Value::Bool(true),
            Value::Unit,
        ]);
        assert_eq!(
            call_method(&list, "join", &[Value::string(", ")]),
            Ok(Value::string("1, a, true, none"))
        );
    }

    #[test]
    fn bound_method_sees_later_mutation() {
        let list = ints(&[1]);
        let size = list.get_attr("size").unwrap();
        call_method(&list, "push", &[Value::Integer(2)]).unwrap();
        assert_eq!(size.call(&[], &KwArgs::default()), Ok(Value::Integer(2)));
    }
}

mod dicts {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn reinsertion_keeps_position() {
        let dict = Value::dict_from([
            (Value::string("a"), Value::Integer(1)),
            (Value::string("b"), Value::Integer(2)),
        ]);
        call_method(&dict, "set", &[Value::string("a"), Value::Integer(3)]).unwrap();

        assert_eq!(call_method(&dict, "size", &[]), Ok(Value::Integer(2)));
        assert_eq!(
            call_method(&dict, "keys", &[]),
            Ok(Value::list(vec![Value::string("a"), Value::string("b")]))
        );
        assert_eq!(call_method(&dict, "values", &[]), Ok(ints(&[3, 2])));
    }

    #[test]
    fn get_and_has() {
        let dict = Value::dict_from([(Value::string("a"), Value::Integer(1))]);
        assert_eq!(
            call_method(&dict, "get", &[Value::string("a")]),
            Ok(Value::Integer(1))
        );
        assert_eq!(call_method(&dict, "get", &[Value::string("z")]), Ok(Value::Unit));
        assert_eq!(
            call_method(&dict, "has", &[Value::string("a")]),
            Ok(Value::Bool(true))
        );
    }

    #[test]
    fn integer_and_string_keys_collide() {
        let dict = Value::dict_from([(Value::Integer(1), Value::string("int"))]);
        call_method(&dict, "set", &[Value::string("1"), Value::string("str")]).unwrap();

        assert_eq!(call_method(&dict, "size", &[]), Ok(Value::Integer(1)));
        assert_eq!(dict.index(&Value::Integer(1)), Ok(Value::string("str")));
    }

    #[test]
    fn dict_as_its_own_key() {
        let dict = Value::dict_from([]);
        call_method(&dict, "set", &[dict.clone(), Value::Integer(1)]).unwrap();
        assert_eq!(call_method(&dict, "size", &[]), Ok(Value::Integer(1)));
    }

    #[test]
    fn unknown_method() {
        let dict = Value::dict_from([]);
        assert_eq!(
            dict.get_attr("push").unwrap_err().to_string(),
            "Dict has no attribute 'push'"
        );
    }
}
