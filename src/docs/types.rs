use serde::{Deserialize, Serialize};

/// A library's documentation manifest (`index.json`)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Library {
    #[serde(default)]
    pub repository_name: String,
    /// README contents
    #[serde(default)]
    pub body: String,
    pub program: Type,
}

/// A documented program entity: module, class, struct, enum, alias, ...
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Type {
    pub html_id: String,
    pub path: String,
    pub kind: String,
    pub full_name: String,
    pub name: String,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub superclass: Option<TypeRef>,
    pub ancestors: Vec<TypeRef>,
    pub locations: Vec<Location>,
    pub repository_name: String,
    pub program: bool,
    #[serde(rename = "enum")]
    pub is_enum: bool,
    #[serde(rename = "alias")]
    pub is_alias: bool,
    pub aliased: Option<String>,
    #[serde(rename = "const")]
    pub is_const: bool,
    pub constants: Vec<Constant>,
    pub included_modules: Vec<TypeRef>,
    pub extended_modules: Vec<TypeRef>,
    pub subclasses: Vec<TypeRef>,
    pub including_types: Vec<TypeRef>,
    pub namespace: Option<TypeRef>,
    pub doc: Option<String>,
    pub summary: Option<String>,
    pub class_methods: Vec<Method>,
    pub constructors: Vec<Method>,
    pub instance_methods: Vec<Method>,
    pub macros: Vec<Method>,
    pub types: Vec<Type>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeRef {
    pub html_id: String,
    pub kind: String,
    pub full_name: String,
    pub name: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Location {
    pub filename: String,
    pub line_number: u32,
    pub url: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Constant {
    pub id: String,
    pub name: String,
    pub value: String,
    pub doc: Option<String>,
    pub summary: Option<String>,
}

/// A method, constructor or macro
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Method {
    pub html_id: String,
    pub name: String,
    pub doc: Option<String>,
    pub summary: Option<String>,
    #[serde(rename = "abstract")]
    pub is_abstract: bool,
    pub args: Vec<Arg>,
    pub args_string: String,
    pub location: Option<Location>,
    pub def: Option<Def>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Arg {
    pub name: String,
    pub external_name: String,
    pub default_value: String,
    pub restriction: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Def {
    pub name: String,
    pub args: Vec<Arg>,
    pub return_type: String,
    pub visibility: String,
    pub body: String,
}

/// Anything that can be matched against a symbol name
pub trait Named {
    fn name(&self) -> &str;

    /// Fully qualified name, when the entity has one distinct from `name`
    fn qualified_name(&self) -> Option<&str> {
        None
    }

    fn matches(&self, symbol: &str) -> bool {
        self.name() == symbol || self.qualified_name() == Some(symbol)
    }
}

impl Named for Type {
    fn name(&self) -> &str {
        &self.name
    }

    fn qualified_name(&self) -> Option<&str> {
        Some(&self.full_name)
    }
}

impl Named for Constant {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Named for Method {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Method {
    /// Human readable signature, e.g. `def push(value : T) : self`.
    /// `prefix` is prepended as is (`"def "`, `"def self."`, `"macro "`).
    pub fn signature(&self, prefix: &str) -> String {
        let mut sig = format!("{}{}{}", prefix, self.name, self.args_string);
        if self.args_string.is_empty() {
            if let Some(def) = &self.def {
                if !def.return_type.is_empty() {
                    sig.push_str(" : ");
                    sig.push_str(&def.return_type);
                }
            }
        }
        sig
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_crystal_manifest() {
        let json = r##"{
            "repository_name": "crystal",
            "body": "# Crystal",
            "program": {
                "html_id": "crystal/toplevel",
                "kind": "module",
                "full_name": "Top Level Namespace",
                "name": "Top Level Namespace",
                "abstract": false,
                "program": true,
                "types": [{
                    "kind": "class",
                    "full_name": "Array(T)",
                    "name": "Array",
                    "constants": [{"id": "X", "name": "X", "value": "1"}],
                    "instance_methods": [{
                        "html_id": "push(value:T):self-instance-method",
                        "name": "push",
                        "abstract": false,
                        "args_string": "(value : T) : self",
                        "location": {"filename": "src/array.cr", "line_number": 12, "url": null},
                        "def": {"name": "push", "args": [{"name": "value", "external_name": "value", "default_value": "", "restriction": "T"}], "return_type": "self", "visibility": "Public", "body": ""}
                    }]
                }]
            }
        }"##;

        let lib: Library = serde_json::from_str(json).expect("manifest should parse");
        assert_eq!(lib.repository_name, "crystal");
        assert!(lib.program.program);
        let array = &lib.program.types[0];
        assert_eq!(array.name, "Array");
        assert_eq!(array.constants[0].value, "1");
        let push = &array.instance_methods[0];
        assert_eq!(push.def.as_ref().unwrap().args[0].restriction, "T");
        assert_eq!(push.signature("def "), "def push(value : T) : self");
    }

    #[test]
    fn test_named_matches_either_name() {
        let t = Type {
            name: "Array".to_string(),
            full_name: "Foo::Array".to_string(),
            ..Type::default()
        };
        assert!(t.matches("Array"));
        assert!(t.matches("Foo::Array"));
        assert!(!t.matches("Foo"));

        let m = Method {
            name: "size".to_string(),
            ..Method::default()
        };
        assert!(m.matches("size"));
        assert!(!m.matches(""));
    }

    #[test]
    fn test_signature_falls_back_to_return_type() {
        let m = Method {
            name: "size".to_string(),
            def: Some(Def {
                return_type: "Int32".to_string(),
                ..Def::default()
            }),
            ..Method::default()
        };
        assert_eq!(m.signature("def "), "def size : Int32");
    }
}
