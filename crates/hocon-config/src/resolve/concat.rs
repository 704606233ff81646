//! Joining the pieces of a concatenation.

use super::Resolver;
use crate::error::ConfigError;
use crate::path::Path;
use crate::substitution::ConfigConcatenation;
use crate::types::{ConfigValue, ConfigValueKind};
use hocon_origin::Origin;

impl Resolver<'_> {
    pub(super) fn resolve_concatenation(
        &mut self,
        concat: &ConfigConcatenation,
        origin: &Origin,
        at: Option<&Path>,
    ) -> Result<Option<ConfigValue>, ConfigError> {
        let mut resolved = Vec::with_capacity(concat.pieces().len());
        for piece in concat.pieces() {
            resolved.push(self.resolve_value(piece, None)?);
        }
        let pieces = surviving_pieces(resolved);

        // only possible when undefined substitutions are allowed
        if pieces.iter().any(|piece| !piece.is_resolved()) {
            return Ok(ConfigValue::concatenation(pieces, origin.clone()));
        }

        join_pieces(pieces, origin, at)
    }
}

/// Drop the pieces that vanished, along with the unquoted whitespace that
/// separated each of them from its neighbor: `${?unset} foo` is `foo`, and
/// `a ${?unset} b` is `a b`.
fn surviving_pieces(resolved: Vec<Option<ConfigValue>>) -> Vec<ConfigValue> {
    let mut keep: Vec<bool> = resolved.iter().map(Option::is_some).collect();
    for index in 0..resolved.len() {
        if resolved[index].is_some() {
            continue;
        }
        let separator = [index.checked_sub(1), Some(index + 1)]
            .into_iter()
            .flatten()
            .find(|&i| {
                keep.get(i).copied().unwrap_or(false)
                    && resolved[i].as_ref().is_some_and(ConfigValue::is_ignorable_whitespace)
            });
        if let Some(separator) = separator {
            keep[separator] = false;
        }
    }

    resolved
        .into_iter()
        .zip(keep)
        .filter_map(|(piece, keep)| if keep { piece } else { None })
        .collect()
}

/// Join resolved pieces left to right. No pieces at all give `None`.
fn join_pieces(
    pieces: Vec<ConfigValue>,
    origin: &Origin,
    at: Option<&Path>,
) -> Result<Option<ConfigValue>, ConfigError> {
    let mut joined: Option<ConfigValue> = None;
    for piece in pieces {
        joined = Some(match joined {
            Some(left) => join(left, piece, origin, at)?,
            None => piece,
        });
    }
    Ok(joined)
}

fn join(
    left: ConfigValue,
    right: ConfigValue,
    origin: &Origin,
    at: Option<&Path>,
) -> Result<ConfigValue, ConfigError> {
    let left_is_container =
        matches!(left.value, ConfigValueKind::Object(_) | ConfigValueKind::List(_));
    let right_is_container =
        matches!(right.value, ConfigValueKind::Object(_) | ConfigValueKind::List(_));

    match (left.value, right.value) {
        (ConfigValueKind::Object(left_object), ConfigValueKind::Object(right_object)) => {
            let left = ConfigValue::from_object(left_object, left.origin);
            let right = ConfigValue::from_object(right_object, right.origin);
            Ok(right.with_fallback(left))
        }
        (ConfigValueKind::List(left_list), ConfigValueKind::List(right_list)) => {
            let origin = Origin::merge_origins([&left.origin, &right.origin]);
            Ok(ConfigValue::new(ConfigValueKind::List(left_list.concat(right_list)), origin))
        }
        (left_value, right_value) => {
            let left = ConfigValue::new(left_value, left.origin);
            let right = ConfigValue::new(right_value, right.origin);

            if left_is_container && right.is_ignorable_whitespace() {
                return Ok(left);
            }
            if right_is_container && left.is_ignorable_whitespace() {
                return Ok(right);
            }
            if left_is_container || right_is_container {
                return Err(ConfigError::WrongType {
                    path: at.cloned(),
                    message: format!(
                        "cannot concatenate {} with {}; objects and lists only join their own kind",
                        left.type_name(),
                        right.type_name()
                    ),
                    origin: origin.clone(),
                });
            }

            match (left.transform_to_string(), right.transform_to_string()) {
                (Some(a), Some(b)) => {
                    let origin = Origin::merge_origins([&left.origin, &right.origin]);
                    Ok(ConfigValue::string(a + &b, origin))
                }
                _ => Err(ConfigError::WrongType {
                    path: at.cloned(),
                    message: format!(
                        "cannot concatenate {} with {}",
                        left.type_name(),
                        right.type_name()
                    ),
                    origin: origin.clone(),
                }),
            }
        }
    }
}
