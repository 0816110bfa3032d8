//! Reflection classification for modulated (composite) structures
//!
//! Every reflection of both buckets is tested against four independent
//! predicates along the chosen modulation axis:
//!
//! - **primary**: `m == 0`
//! - **secondary**: axis index `== 0`, any `m`
//! - **common**: axis index `== 0` and `m == 0`
//! - **satellites**: `m != 0` and axis index `!= 0`
//!
//! The families overlap. A reflection matching several predicates is a
//! member of each of them; members are stored as [`ReflectionRef`]s into the
//! dataset's [`ReflectionSet`] rather than copies.
//!
//! Only a single modulation axis is supported.

use tracing::debug;

use crate::constants::LABEL_LINE_BREAK;
use crate::models::{
    ClassifiedReflections, Family, ModulationAxis, Reflection, ReflectionFamily, ReflectionRef,
    ReflectionSet,
};

/// Families a reflection belongs to along `axis`
pub fn families_of(reflection: &Reflection, axis: ModulationAxis) -> Vec<Family> {
    let on_common_rod = reflection.index_along(axis) == 0;
    let main = reflection.m == 0;

    Family::ALL
        .into_iter()
        .filter(|family| match family {
            Family::Primary => main,
            Family::Secondary => on_common_rod,
            Family::Common => on_common_rod && main,
            Family::Satellites => !main && !on_common_rod,
        })
        .collect()
}

/// Classify every reflection of a set along a modulation axis
pub fn classify(reflections: &ReflectionSet, axis: ModulationAxis) -> ClassifiedReflections {
    let mut classified = ClassifiedReflections {
        axis,
        primary: ReflectionFamily::new(Family::Primary),
        secondary: ReflectionFamily::new(Family::Secondary),
        common: ReflectionFamily::new(Family::Common),
        satellites: ReflectionFamily::new(Family::Satellites),
    };

    for (reference, reflection) in reflections.iter_all() {
        for family in families_of(reflection, axis) {
            let target = match family {
                Family::Primary => &mut classified.primary,
                Family::Secondary => &mut classified.secondary,
                Family::Common => &mut classified.common,
                Family::Satellites => &mut classified.satellites,
            };
            push_member(target, reference, reflection);
        }
    }

    debug!(
        "Classified {} reflections along {}: {} primary, {} secondary, {} common, {} satellites",
        reflections.len(),
        axis,
        classified.primary.len(),
        classified.secondary.len(),
        classified.common.len(),
        classified.satellites.len()
    );

    classified
}

fn push_member(target: &mut ReflectionFamily, reference: ReflectionRef, reflection: &Reflection) {
    target.members.push(reference);
    target.tth.push(reflection.tth);
    target.q.push(reflection.q);
    target.d.push(reflection.d_spacing);
    target.s.push(reflection.s);
    target
        .labels
        .push(family_label(target.family, reflection));
}

/// Presentation label for a classified reflection
pub fn family_label(family: Family, reflection: &Reflection) -> String {
    let fwhm = reflection
        .fwhm
        .map(|w| format!("{:.4}", w))
        .unwrap_or_else(|| "n/a".to_string());
    let mut label = [
        format!("2theta: {:.4}", reflection.tth),
        format!("q: {:.4}", reflection.q),
        format!("label: {}", family.name()),
        format!("hklm: ({})", reflection.hklm()),
        format!("d: {:.4}", reflection.d_spacing),
        format!("f^2: {:.4}", reflection.fsq),
        format!("fwhm: {}", fwhm),
    ]
    .join(LABEL_LINE_BREAK);
    label.push_str(LABEL_LINE_BREAK);
    label
}
