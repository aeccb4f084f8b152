use serde::Deserialize;

// the frontend sends ids taken from object keys, so "3" and 3 must both be accepted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "IntOrString")]
pub struct LooseInt(pub i64);

#[derive(Deserialize)]
#[serde(untagged)]
enum IntOrString {
    Int(i64),
    Str(String),
}

impl TryFrom<IntOrString> for LooseInt {
    type Error = String;

    fn try_from(value: IntOrString) -> Result<Self, Self::Error> {
        match value {
            IntOrString::Int(v) => Ok(LooseInt(v)),
            IntOrString::Str(s) => match s.trim().parse::<i64>() {
                Ok(v) => Ok(LooseInt(v)),
                Err(_) => Err(format!("Wrong value {s}, can not parse to i64")),
            },
        }
    }
}
