use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassOption {
    pub class_id: i64,
    pub class_name: String,
}

impl ClassOption {
    /// Sort a class list ascending by id, the order the picker shows them in.
    pub fn sort_by_id(classes: &mut [ClassOption]) {
        classes.sort_by_key(|c| c.class_id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn class(id: i64, name: &str) -> ClassOption {
        ClassOption {
            class_id: id,
            class_name: name.to_string(),
        }
    }

    #[test]
    fn test_sort_by_id() {
        let mut classes = vec![class(5, "Warrior"), class(1, "Anti-Paladin"), class(3, "Bard")];
        ClassOption::sort_by_id(&mut classes);
        let ids: Vec<i64> = classes.iter().map(|c| c.class_id).collect();
        assert_eq!(ids, vec![1, 3, 5]);
    }

    #[test]
    fn test_parse_class_list() {
        let json = r#"[{"class_id": 7, "class_name": "Healer"}, {"class_id": 2, "class_name": "Archer"}]"#;
        let classes: Vec<ClassOption> = serde_json::from_str(json).unwrap();
        assert_eq!(classes.len(), 2);
        assert_eq!(classes[0].class_name, "Healer");
    }
}
