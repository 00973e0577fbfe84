//! 依赖注入实现的集成测试

use di_abstractions::{ComponentRegistry, ComponentRegistryExt, Container, ContainerConfig};
use di_impl::DiContainerImpl;
use infrastructure_common::{
    ContractId, DependencyError, DependencyResult, Injectable, Lifetime, ServiceProvider,
    ServiceProviderExt, TypeDescriptor,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// 测试仓储
#[derive(Debug)]
struct UserRepository {
    connection: String,
}

/// 依赖仓储的测试服务
#[derive(Debug)]
struct UserService {
    repository: Arc<UserRepository>,
}

impl Injectable for UserService {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        Ok(Self {
            repository: provider.resolve::<UserRepository>()?,
        })
    }
}

#[derive(Debug)]
struct Ping;

impl Injectable for Ping {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        provider.resolve::<Pong>()?;
        Ok(Ping)
    }
}

#[derive(Debug)]
struct Pong;

impl Injectable for Pong {
    fn inject(provider: &dyn ServiceProvider) -> DependencyResult<Self> {
        provider.resolve::<Ping>()?;
        Ok(Pong)
    }
}

#[test]
fn test_component_registration_and_resolution() {
    let container = DiContainerImpl::new();

    container
        .register_singleton(UserRepository {
            connection: "memory".to_string(),
        })
        .unwrap();
    container.register::<UserService>(Lifetime::Transient).unwrap();

    assert!(container.is_registered(&ContractId::of::<UserService>()));

    let service = container.resolve::<UserService>().unwrap();
    assert_eq!(service.repository.connection, "memory");
}

#[test]
fn test_singleton_and_transient_lifetimes() {
    let container = DiContainerImpl::new();
    let created = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&created);
    container
        .register_factory::<UserRepository, _>(
            move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok(UserRepository {
                    connection: "singleton".to_string(),
                })
            },
            Lifetime::Singleton,
        )
        .unwrap();
    container.register::<UserService>(Lifetime::Transient).unwrap();

    let first = container.resolve::<UserService>().unwrap();
    let second = container.resolve::<UserService>().unwrap();

    // 瞬时服务每次都是新实例，单例仓储只创建一次
    assert!(!Arc::ptr_eq(&first, &second));
    assert!(Arc::ptr_eq(&first.repository, &second.repository));
    assert_eq!(created.load(Ordering::SeqCst), 1);
}

#[test]
fn test_registration_is_additive() {
    let container = DiContainerImpl::new();

    container
        .register_singleton(UserRepository {
            connection: "first".to_string(),
        })
        .unwrap();
    container
        .register_singleton(UserRepository {
            connection: "second".to_string(),
        })
        .unwrap();

    assert_eq!(container.registration_count(), 2);

    // 最后一次注册生效
    let latest = container.resolve::<UserRepository>().unwrap();
    assert_eq!(latest.connection, "second");

    let all = container.resolve_all::<UserRepository>().unwrap();
    let connections: Vec<&str> = all.iter().map(|r| r.connection.as_str()).collect();
    assert_eq!(connections, vec!["first", "second"]);
}

#[test]
fn test_unregistered_component() {
    let container = DiContainerImpl::new();

    let err = container.resolve::<UserRepository>().unwrap_err();
    assert!(matches!(err, DependencyError::ComponentNotRegistered { .. }));
    assert!(container.resolve_all::<UserRepository>().unwrap().is_empty());
}

#[test]
fn test_abstract_type_rejected() {
    trait Repository {}
    let container = DiContainerImpl::new();

    let err = container
        .register_type(&TypeDescriptor::abstract_type::<dyn Repository>(), Lifetime::Transient)
        .unwrap_err();

    assert!(matches!(err, DependencyError::RegistrationError { .. }));
    assert_eq!(container.registration_count(), 0);
}

#[test]
fn test_circular_dependency_detected() {
    let container = DiContainerImpl::new();
    container.register::<Ping>(Lifetime::Transient).unwrap();
    container.register::<Pong>(Lifetime::Singleton).unwrap();

    let err = container.resolve::<Ping>().unwrap_err();
    assert!(matches!(err, DependencyError::CircularDependency { .. }));
}

#[test]
fn test_resolution_depth_limit() {
    let container = DiContainerImpl::with_config(ContainerConfig {
        max_resolution_depth: 1,
    });
    container
        .register_singleton(UserRepository {
            connection: "memory".to_string(),
        })
        .unwrap();
    container.register::<UserService>(Lifetime::Transient).unwrap();

    let err = container.resolve::<UserService>().unwrap_err();
    assert!(matches!(err, DependencyError::DependencyResolutionFailed { .. }));
}

#[test]
fn test_container_verification() {
    let container = DiContainerImpl::new();
    container.register::<UserService>(Lifetime::Transient).unwrap();

    // 缺少仓储依赖
    let errors = container.verify().unwrap_err();
    assert_eq!(errors.len(), 1);

    container
        .register_singleton(UserRepository {
            connection: "memory".to_string(),
        })
        .unwrap();
    assert!(container.verify().is_ok());
}

#[test]
fn test_registered_components_and_clear() {
    let container = DiContainerImpl::new();
    container
        .register_singleton(UserRepository {
            connection: "memory".to_string(),
        })
        .unwrap();
    container.register::<UserService>(Lifetime::Transient).unwrap();

    let components = container.registered_components();
    assert_eq!(components.len(), 2);
    assert_eq!(components[0].name(), "UserRepository");
    assert_eq!(components[0].lifetime, Lifetime::Singleton);
    assert_eq!(components[1].name(), "UserService");
    assert_eq!(components[1].lifetime, Lifetime::Transient);

    container.clear();
    assert_eq!(container.registration_count(), 0);
    assert!(!container.is_registered(&ContractId::of::<UserService>()));
}

#[test]
fn test_type_mismatch() {
    let container = DiContainerImpl::new();
    container
        .register_instance(ContractId::of::<UserRepository>(), Arc::new(42_u32))
        .unwrap();

    let err = container.resolve::<UserRepository>().unwrap_err();
    assert!(matches!(err, DependencyError::TypeMismatch { .. }));
}

#[test]
fn test_container_as_trait_objects() {
    let container: Arc<dyn Container> = Arc::new(DiContainerImpl::new());
    container
        .as_registry()
        .register_singleton(UserRepository {
            connection: "shared".to_string(),
        })
        .unwrap();

    let repository = container.as_provider().resolve::<UserRepository>().unwrap();
    assert_eq!(repository.connection, "shared");
}
