use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseError {
    #[error("Invalid direction '{0}'. Expected three comma-separated numbers (e.g., '0,0,1').")]
    InvalidDirectionFormat(String),

    #[error("Component '{component}' of '{value}' is not a finite number.")]
    InvalidComponent { component: String, value: String },

    #[error("Direction '{0}' has zero length.")]
    ZeroDirection(String),

    #[error("Invalid species '{0}'. Expected 'ID' or 'ID:ETA' (e.g., 'O2_side:2').")]
    InvalidSpecies(String),
}

/// Splits a `-s` value into the species identifier and an optional hapticity,
/// as in `O2_side:2`.
pub fn parse_species(value: &str) -> Result<(&str, Option<u8>), ParseError> {
    let invalid = || ParseError::InvalidSpecies(value.to_string());
    let (id, eta) = match value.split_once(':') {
        Some((id, eta)) => {
            let eta = eta.trim().parse::<u8>().map_err(|_| invalid())?;
            (id.trim(), Some(eta))
        }
        None => (value.trim(), None),
    };
    if id.is_empty() {
        return Err(invalid());
    }
    Ok((id, eta))
}

/// Parses an `x,y,z` triple as given to `--direction`.
pub fn parse_direction(value: &str) -> Result<[f64; 3], ParseError> {
    let parts: Vec<&str> = value.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(ParseError::InvalidDirectionFormat(value.to_string()));
    }

    let mut components = [0.0; 3];
    for (slot, part) in components.iter_mut().zip(&parts) {
        let parsed: f64 = part.parse().map_err(|_| ParseError::InvalidComponent {
            component: part.to_string(),
            value: value.to_string(),
        })?;
        if !parsed.is_finite() {
            return Err(ParseError::InvalidComponent {
                component: part.to_string(),
                value: value.to_string(),
            });
        }
        *slot = parsed;
    }

    if components.iter().all(|c| *c == 0.0) {
        return Err(ParseError::ZeroDirection(value.to_string()));
    }
    Ok(components)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_signed_components_with_whitespace() {
        assert_eq!(parse_direction("0, -1 ,2.5"), Ok([0.0, -1.0, 2.5]));
    }

    #[test]
    fn wrong_component_count_is_rejected() {
        assert_eq!(
            parse_direction("1,2"),
            Err(ParseError::InvalidDirectionFormat("1,2".to_string()))
        );
        assert!(parse_direction("1,2,3,4").is_err());
    }

    #[test]
    fn non_numeric_and_non_finite_components_are_rejected() {
        assert_eq!(
            parse_direction("1,x,0"),
            Err(ParseError::InvalidComponent {
                component: "x".to_string(),
                value: "1,x,0".to_string()
            })
        );
        assert!(parse_direction("1,NaN,0").is_err());
        assert!(parse_direction("inf,0,0").is_err());
    }

    #[test]
    fn zero_vector_is_rejected() {
        assert_eq!(
            parse_direction("0,0,0"),
            Err(ParseError::ZeroDirection("0,0,0".to_string()))
        );
    }

    #[test]
    fn species_may_carry_its_own_eta() {
        assert_eq!(parse_species("O2_end"), Ok(("O2_end", None)));
        assert_eq!(parse_species("O2_side:2"), Ok(("O2_side", Some(2))));
        assert_eq!(parse_species(" O : 1 "), Ok(("O", Some(1))));
    }

    #[test]
    fn malformed_species_values_are_rejected() {
        for value in ["", ":1", "O2_side:", "O2_side:two", "O2_side:-1", "O2:1:2"] {
            assert_eq!(
                parse_species(value),
                Err(ParseError::InvalidSpecies(value.to_string())),
                "{value}"
            );
        }
    }
}
