use resources::{
    models::workload::AutoscalerDeclaration,
    objects::{
        hpa::{HorizontalPodAutoscaler, HorizontalPodAutoscalerSpec},
        object_reference::ObjectReference,
        Metadata,
    },
};

use crate::{
    deployment::DEPLOYMENT_API_VERSION,
    error::{Error, Result},
    resolver::base_name,
    validator::ValidatedSpec,
};

pub const DEFAULT_CPU_PERCENTAGE: u32 = 50;

/// Autoscaler for the workload, when one is declared.
///
/// The lower bound defaults to the resolved replica count and the upper
/// bound to one more than the lower bound.
pub fn autoscaler(spec: &ValidatedSpec) -> Result<Option<HorizontalPodAutoscaler>> {
    let declaration = match &spec.autoscaler {
        Some(declaration) => declaration,
        None => return Ok(None),
    };
    let AutoscalerDeclaration {
        min_replicas,
        max_replicas,
        cpu_percentage,
    } = declaration;

    let min_replicas = min_replicas.unwrap_or(spec.replicas);
    let max_replicas = max_replicas.unwrap_or(min_replicas + 1);
    if max_replicas < min_replicas {
        return Err(Error::Validation(format!(
            "autoscaler of '{}' allows at most {} replicas but requires at least {}",
            spec.name, max_replicas, min_replicas
        )));
    }

    let mut metadata = Metadata::new(
        format!("{}-hpa", base_name(&spec.name)),
        spec.namespace.clone(),
    );
    metadata.labels = spec.labels.clone();

    Ok(Some(HorizontalPodAutoscaler {
        api_version: "autoscaling/v1".to_string(),
        metadata,
        spec: HorizontalPodAutoscalerSpec {
            scale_target_ref: ObjectReference::new(
                DEPLOYMENT_API_VERSION,
                "Deployment",
                spec.name.clone(),
            ),
            min_replicas,
            max_replicas,
            target_cpu_utilization_percentage: cpu_percentage.unwrap_or(DEFAULT_CPU_PERCENTAGE),
        },
    }))
}

#[cfg(test)]
mod tests {
    use resources::models::workload::WorkloadSpec;

    use super::*;
    use crate::validator::validate;

    fn spec(replicas: u32, declaration: Option<AutoscalerDeclaration>) -> ValidatedSpec {
        let mut spec = WorkloadSpec::new("hello-deployment");
        spec.image = "hello".to_string();
        spec.replicas = replicas;
        spec.autoscaler = declaration;
        validate(spec).unwrap()
    }

    #[test]
    fn defaults_derive_from_replicas() {
        let hpa = autoscaler(&spec(3, Some(AutoscalerDeclaration::default())))
            .unwrap()
            .unwrap();
        assert_eq!(hpa.metadata.name, "hello-hpa");
        assert_eq!(hpa.spec.min_replicas, 3);
        assert_eq!(hpa.spec.max_replicas, 4);
        assert_eq!(hpa.spec.target_cpu_utilization_percentage, 50);
        assert_eq!(hpa.spec.scale_target_ref.name, "hello-deployment");
        assert_eq!(hpa.spec.scale_target_ref.kind, "Deployment");
    }

    #[test]
    fn declared_bounds() {
        let declaration = AutoscalerDeclaration {
            min_replicas: Some(2),
            max_replicas: Some(10),
            cpu_percentage: Some(75),
        };
        let hpa = autoscaler(&spec(1, Some(declaration))).unwrap().unwrap();
        assert_eq!((hpa.spec.min_replicas, hpa.spec.max_replicas), (2, 10));
        assert_eq!(hpa.spec.target_cpu_utilization_percentage, 75);
    }

    #[test]
    fn inverted_bounds_rejected() {
        let declaration = AutoscalerDeclaration {
            min_replicas: Some(5),
            max_replicas: Some(2),
            cpu_percentage: None,
        };
        assert!(matches!(
            autoscaler(&spec(1, Some(declaration))),
            Err(Error::Validation(_))
        ));
    }

    #[test]
    fn undeclared() {
        assert_eq!(autoscaler(&spec(1, None)).unwrap(), None);
    }
}
