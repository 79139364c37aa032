#[cfg(test)]
pub mod test {
    use std::time::Duration;

    use crate::field::{BindField, Bindable, Field, Slot};

    /// Record with one field of every supported kind, written the way
    /// `#[derive(Bindable)]` expands.
    #[derive(Debug, Default, PartialEq)]
    pub struct Structure {
        pub bool: bool,
        pub int: isize,
        pub int8: i8,
        pub int16: i16,
        pub int32: i32,
        pub int64: i64,
        pub uint: usize,
        pub uint8: u8,
        pub uint16: u16,
        pub uint32: u32,
        pub uint64: u64,
        pub float32: f32,
        pub float64: f64,
        pub duration: Duration,
        pub tags: Vec<String>,
        pub string: String,
        pub nested: Nested,
        pub secret: String,
    }

    #[derive(Debug, Default, PartialEq)]
    pub struct Nested {
        pub string: String,
        pub max_connections: u32,
    }

    impl Bindable for Structure {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("bool", self.bool.slot()).usage("A boolean."),
                Field::new("int", self.int.slot()),
                Field::new("int8", self.int8.slot()),
                Field::new("int16", self.int16.slot()),
                Field::new("int32", self.int32.slot()),
                Field::new("int64", self.int64.slot()),
                Field::new("uint", self.uint.slot()),
                Field::new("uint8", self.uint8.slot()),
                Field::new("uint16", self.uint16.slot()),
                Field::new("uint32", self.uint32.slot()),
                Field::new("uint64", self.uint64.slot()),
                Field::new("float32", self.float32.slot()),
                Field::new("float64", self.float64.slot()),
                Field::new("duration", self.duration.slot()),
                Field::new("tags", self.tags.slot()),
                Field::new("string", self.string.slot()),
                Field::new("nested", Slot::Record(&mut self.nested)),
                Field::unsettable("secret"),
            ]
        }
    }

    impl Bindable for Nested {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("string", self.string.slot()),
                Field::new("max_connections", self.max_connections.slot())
                    .usage("Connection limit."),
            ]
        }
    }

    /// Identifiers in Pascal case, as a hand-written impl might list them.
    #[derive(Debug, Default, PartialEq)]
    pub struct Pascal {
        pub http_server: String,
        pub lisp_case: bool,
        pub inner: Nested,
    }

    impl Bindable for Pascal {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("HTTPServer", self.http_server.slot()),
                Field::new("LispCase", self.lisp_case.slot()),
                Field::new("Inner", Slot::Record(&mut self.inner)),
            ]
        }
    }

    /// Two fields whose lisp-case names collide.
    #[derive(Debug, Default)]
    pub struct Colliding {
        pub first: i8,
        pub second: i8,
        pub third: i8,
    }

    impl Bindable for Colliding {
        fn fields(&mut self) -> Vec<Field<'_>> {
            vec![
                Field::new("Int8", self.first.slot()),
                Field::new("int8", self.second.slot()),
                Field::new("other", self.third.slot()),
            ]
        }
    }

    #[test]
    fn structure_lists_fields_in_declaration_order() {
        let mut s = Structure::default();
        let idents: Vec<_> = s.fields().iter().map(Field::ident).collect();
        assert_eq!(idents.first(), Some(&"bool"));
        assert_eq!(idents.last(), Some(&"secret"));
        assert_eq!(idents.len(), 18);
    }
}
