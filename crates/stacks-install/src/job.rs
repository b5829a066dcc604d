//! Unpack job construction

use crate::config::ExecutorInfo;
use stacks_types::{
    Container, EmptyDirVolumeSource, InstallRequest, Job, JobSpec, ObjectMeta, PodSpec,
    PodTemplateSpec, RestartPolicy, Volume, VolumeMount,
};

/// Directory inside the package image holding the stack registry
pub const REGISTRY_DIR_NAME: &str = ".registry";
/// Where the package contents are copied for the executor
pub const PACKAGE_MOUNT_PATH: &str = "/ext-pkg";
pub const PACKAGE_CONTENTS_VOLUME: &str = "package-contents";

const JOB_BACKOFF_LIMIT: i32 = 0;

/// Build the one-shot job that unpacks the request's package.
///
/// The init container copies the registry out of the package image into a
/// scratch volume; the executor then prints every unpacked resource to stdout.
/// Debug output must stay off, it would end up in the decoded stream.
pub fn create_install_job(request: &InstallRequest, executor: &ExecutorInfo) -> Job {
    let mount = VolumeMount {
        name: PACKAGE_CONTENTS_VOLUME.to_string(),
        mount_path: PACKAGE_MOUNT_PATH.to_string(),
    };

    let mut metadata = ObjectMeta::named(request.namespace(), request.name());
    metadata.owner_references.push(request.as_owner());

    Job {
        metadata,
        spec: JobSpec {
            backoff_limit: Some(JOB_BACKOFF_LIMIT),
            template: PodTemplateSpec {
                metadata: ObjectMeta::default(),
                spec: PodSpec {
                    restart_policy: Some(RestartPolicy::Never),
                    init_containers: vec![Container {
                        name: "stack-package".to_string(),
                        image: request.image().to_string(),
                        command: vec![
                            "cp".to_string(),
                            "-R".to_string(),
                            REGISTRY_DIR_NAME.to_string(),
                            format!("{}/", PACKAGE_MOUNT_PATH),
                        ],
                        args: Vec::new(),
                        volume_mounts: vec![mount.clone()],
                    }],
                    containers: vec![Container {
                        name: "stack-executor".to_string(),
                        image: executor.image.clone(),
                        command: Vec::new(),
                        args: vec![
                            "stack".to_string(),
                            "unpack".to_string(),
                            format!(
                                "--content-dir={}/{}",
                                PACKAGE_MOUNT_PATH, REGISTRY_DIR_NAME
                            ),
                            format!("--permission-scope={}", request.permission_scope()),
                        ],
                        volume_mounts: vec![mount],
                    }],
                    volumes: vec![Volume {
                        name: PACKAGE_CONTENTS_VOLUME.to_string(),
                        empty_dir: Some(EmptyDirVolumeSource::default()),
                    }],
                },
            },
        },
    }
}
