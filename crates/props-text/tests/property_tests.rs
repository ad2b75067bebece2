use props_meta::Arg;
use props_text::{Substitutor, format};
use proptest::prelude::*;
use std::collections::HashMap;

proptest! {
    #[test]
    fn test_text_without_markers_is_untouched(s in "[^%$]*") {
        // No `%` and no `$`: neither stage has anything to act on.
        prop_assert_eq!(format(&s, &[Arg::from("unused")]).unwrap(), s.clone());
        prop_assert_eq!(Substitutor::default().replace(&s), s);
    }

    #[test]
    fn test_string_hole_is_verbatim(arg in "\\PC*") {
        let formatted = format("<%s>", &[Arg::from(arg.as_str())]).unwrap();
        prop_assert_eq!(formatted, format!("<{}>", arg));
    }

    #[test]
    fn test_defined_variable_is_replaced(name in "[a-z][a-z0-9.]{0,12}", value in "[^$]*") {
        let subst = Substitutor::new(HashMap::from([(name.clone(), value.clone())]));
        let replaced = subst.replace(&format!("[${{{}}}]", name));
        prop_assert_eq!(replaced, format!("[{}]", value));
    }

    #[test]
    fn test_integers_render_like_display(n in any::<i64>()) {
        prop_assert_eq!(format("%d", &[Arg::from(n)]).unwrap(), n.to_string());
    }
}
