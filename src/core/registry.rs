//! # Service Registry
//!
//! 싱글톤 컴포넌트의 등록과 초기화를 담당합니다.
//!
//! - **인프라 컴포넌트** (`Database`, `RedisClient`)는 시작 시
//!   [`ServiceLocator::set`]으로 직접 등록합니다.
//! - **리포지토리/서비스**는 `#[repository]`, `#[service]` 매크로가
//!   [`RepositoryRegistration`], [`ServiceRegistration`]을 `inventory`로 제출하고
//!   `instance()`를 생성합니다. `Arc<T>` 필드는 [`ServiceLocator::get`]으로 주입됩니다.
//! - 트레이트 객체를 주입받는 서비스(`UserService`, `IdentityFlowService`)는
//!   생성자를 직접 두고 등록 정보도 직접 제출합니다.
//!
//! ```text
//! main
//!  ├─ ServiceLocator::set(Arc<Database>)
//!  ├─ ServiceLocator::set(Arc<RedisClient>)
//!  └─ ServiceLocator::initialize_all()
//!       ├─ Repository: user_repository
//!       ├─ Repository: avatar_repository
//!       ├─ Service:    token_service
//!       ├─ Service:    user_service
//!       └─ Service:    identity_flow_service
//! ```
//!
//! 타입 이름으로 등록 정보를 찾습니다. `UserRepository`는 `user_repository`로,
//! `TokenService`는 `token_service`로 등록된 생성자를 사용합니다.

use std::any::{Any, TypeId};
use std::collections::{HashMap, HashSet};
use std::sync::{Arc, RwLock};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use crate::errors::AppError;
use crate::utils::display_terminal::{print_banner, print_component, print_phase, print_phase_done, print_summary};

#[async_trait]
pub trait Service: Send + Sync {
    fn name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

#[async_trait]
pub trait Repository: Send + Sync {
    fn name(&self) -> &str;

    fn collection_name(&self) -> &str;

    async fn init(&self) -> Result<(), Box<dyn std::error::Error>>;
}

/// `inventory`로 수집되는 서비스 등록 정보
///
/// `constructor`는 `Box<Arc<T>>`를, 실패하면 `Box<AppError>`를 돌려줍니다.
pub struct ServiceRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

/// `inventory`로 수집되는 리포지토리 등록 정보
pub struct RepositoryRegistration {
    pub name: &'static str,
    pub constructor: fn() -> Box<dyn Any + Send + Sync>,
}

inventory::collect!(ServiceRegistration);
inventory::collect!(RepositoryRegistration);

static SERVICE_NAME_CACHE: Lazy<HashMap<String, &'static ServiceRegistration>> = Lazy::new(|| {
    inventory::iter::<ServiceRegistration>
        .into_iter()
        .map(|registration| (clean_registration_name(registration.name), registration))
        .collect()
});

static REPOSITORY_NAME_CACHE: Lazy<HashMap<String, &'static RepositoryRegistration>> = Lazy::new(|| {
    inventory::iter::<RepositoryRegistration>
        .into_iter()
        .map(|registration| (clean_registration_name(registration.name), registration))
        .collect()
});

/// "user_repository" → "user", "identity_flow_service" → "identityflow"
fn clean_registration_name(name: &str) -> String {
    name.strip_suffix("_service")
        .or_else(|| name.strip_suffix("_repository"))
        .unwrap_or(name)
        .replace('_', "")
}

/// 타입 기반 전역 인스턴스 저장소
pub struct ServiceLocator {
    instances: RwLock<HashMap<TypeId, Arc<dyn Any + Send + Sync>>>,
    initializing: RwLock<HashSet<TypeId>>,
}

static LOCATOR: Lazy<ServiceLocator> = Lazy::new(|| ServiceLocator {
    instances: RwLock::new(HashMap::new()),
    initializing: RwLock::new(HashSet::new()),
});

impl ServiceLocator {
    /// 인스턴스를 등록합니다. 같은 타입이 이미 있으면 교체됩니다.
    pub fn set<T: 'static + Send + Sync>(instance: Arc<T>) {
        let name = short_type_name(std::any::type_name::<T>());

        match LOCATOR.instances.write() {
            Ok(mut instances) => {
                instances.insert(TypeId::of::<T>(), instance as Arc<dyn Any + Send + Sync>);
                log::info!("📦 Registering: {}", name);
            }
            Err(_) => log::error!("ServiceLocator lock poisoned, {} not registered", name),
        }
    }

    /// 매크로가 생성한 `instance()`와 필드 주입이 사용하는 조회 함수
    ///
    /// # Panics
    ///
    /// 등록되지 않았거나 순환 의존이 있으면 시작 단계에서 중단합니다.
    /// 요청 처리 경로에서는 [`ServiceLocator::try_get`]을 사용합니다.
    pub fn get<T: 'static + Send + Sync>() -> Arc<T> {
        match Self::try_get::<T>() {
            Ok(instance) => instance,
            Err(e) => panic!("{}", e),
        }
    }

    /// 등록된 인스턴스를 가져오고, 없으면 등록된 생성자로 만듭니다.
    ///
    /// # Errors
    ///
    /// 등록 정보가 없거나, 순환 의존이거나, 타입이 맞지 않으면 `AppError::InternalError`
    pub fn try_get<T: 'static + Send + Sync>() -> Result<Arc<T>, AppError> {
        let type_id = TypeId::of::<T>();
        let name = short_type_name(std::any::type_name::<T>());

        if let Some(instance) = Self::cached::<T>()? {
            return Ok(instance);
        }

        {
            let mut initializing = LOCATOR.initializing.write().map_err(|_| poisoned())?;
            if !initializing.insert(type_id) {
                return Err(AppError::InternalError(format!(
                    "Circular dependency detected: {} is already being initialized", name
                )));
            }
        }

        // 생성자 안에서 다시 get()이 호출되므로 락을 잡지 않은 채로 만듭니다.
        let created = Self::construct::<T>(name);

        if let Ok(mut initializing) = LOCATOR.initializing.write() {
            initializing.remove(&type_id);
        }

        let instance = created?;
        let mut instances = LOCATOR.instances.write().map_err(|_| poisoned())?;
        let stored = instances
            .entry(type_id)
            .or_insert_with(|| instance as Arc<dyn Any + Send + Sync>)
            .clone();

        stored.downcast::<T>()
            .map_err(|_| AppError::InternalError(format!("Type mismatch in ServiceLocator: {}", name)))
    }

    /// 등록 여부 확인
    pub fn contains<T: 'static + Send + Sync>() -> bool {
        LOCATOR.instances.read()
            .map(|instances| instances.contains_key(&TypeId::of::<T>()))
            .unwrap_or(false)
    }

    /// 제출된 모든 컴포넌트를 리포지토리 → 서비스 순서로 생성합니다.
    ///
    /// # Errors
    ///
    /// 생성자가 실패하면 `AppError::InternalError`
    pub async fn initialize_all() -> Result<(), AppError> {
        print_banner("🔄 INITIALIZING SERVICE REGISTRY");

        let repositories = Self::repository_names();
        let services = Self::service_names();

        print_phase(1, "Repositories");
        for registration in inventory::iter::<RepositoryRegistration> {
            Self::run_constructor(registration.name, registration.constructor)?;
        }
        print_phase_done(1, "Repositories", repositories.len());

        print_phase(2, "Services");
        for registration in inventory::iter::<ServiceRegistration> {
            Self::run_constructor(registration.name, registration.constructor)?;
        }
        print_phase_done(2, "Services", services.len());

        print_summary(repositories.len(), services.len());
        Ok(())
    }

    /// 등록된 리포지토리 이름 (이름순)
    pub fn repository_names() -> Vec<&'static str> {
        let mut names: Vec<_> = inventory::iter::<RepositoryRegistration>
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort_unstable();
        names
    }

    /// 등록된 서비스 이름 (이름순)
    pub fn service_names() -> Vec<&'static str> {
        let mut names: Vec<_> = inventory::iter::<ServiceRegistration>
            .into_iter()
            .map(|r| r.name)
            .collect();
        names.sort_unstable();
        names
    }

    fn cached<T: 'static + Send + Sync>() -> Result<Option<Arc<T>>, AppError> {
        let instances = LOCATOR.instances.read().map_err(|_| poisoned())?;
        Ok(instances.get(&TypeId::of::<T>()).and_then(|i| i.clone().downcast::<T>().ok()))
    }

    fn construct<T: 'static + Send + Sync>(name: &str) -> Result<Arc<T>, AppError> {
        let constructor = if let Some(entity) = name.strip_suffix("Repository") {
            REPOSITORY_NAME_CACHE.get(&entity.to_lowercase()).map(|r| r.constructor)
        } else if let Some(entity) = name.strip_suffix("Service") {
            SERVICE_NAME_CACHE.get(&entity.to_lowercase()).map(|r| r.constructor)
        } else {
            None
        };

        let constructor = constructor.ok_or_else(|| AppError::InternalError(format!(
            "{} is not registered. Use #[service]/#[repository] or ServiceLocator::set()", name
        )))?;

        match constructor().downcast::<Arc<T>>() {
            Ok(instance) => Ok(*instance),
            Err(other) => Err(constructor_error(name, other)),
        }
    }

    fn run_constructor(name: &str, constructor: fn() -> Box<dyn Any + Send + Sync>) -> Result<(), AppError> {
        let failure = match std::panic::catch_unwind(constructor) {
            Ok(boxed) => boxed.downcast::<AppError>().ok().map(|e| e.to_string()),
            Err(_) => Some("생성자 패닉".to_string()),
        };

        match failure {
            None => {
                print_component(name, "✓ Ready");
                Ok(())
            }
            Some(reason) => {
                print_component(name, "✗ Failed");
                Err(AppError::InternalError(format!("{} 초기화 실패: {}", name, reason)))
            }
        }
    }
}

/// 생성자는 실패를 `Box<AppError>`로 돌려줄 수 있습니다.
fn constructor_error(name: &str, boxed: Box<dyn Any + Send + Sync>) -> AppError {
    match boxed.downcast::<AppError>() {
        Ok(error) => *error,
        Err(_) => AppError::InternalError(format!("Type mismatch for component: {}", name)),
    }
}

fn poisoned() -> AppError {
    AppError::InternalError("ServiceLocator lock poisoned".to_string())
}

fn short_type_name(type_name: &str) -> &str {
    type_name.rsplit("::").next().unwrap_or(type_name)
}
