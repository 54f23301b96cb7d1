//! # Application Dependencies / 应用依赖
//!
//! Port grouping for constructing the shell's use cases.
//! 构造用例所需端口的分组。
//!
//! **Note / 注意**: This is NOT a Builder pattern. No defaults, no hidden
//! logic, just parameter grouping.
//! **这不是 Builder 模式。** 仅用于参数打包。

use std::sync::Arc;

use ws_core::ports::{
    ClockPort, EntityApiPort, HostSignalPort, ListApiPort, ModuleImporterPort, ModuleSourcePort,
    ObjectUrlPort, ProfileNavigatorPort, SchedulerPort, ScriptHostPort,
};
use ws_core::widget::ExternalWidgetRegistry;

/// Every port the use cases need. All fields are required.
/// 用例所需的全部端口，均为必需。
pub struct AppDeps {
    // REST collaborator / REST 协作方
    pub entity_api: Arc<dyn EntityApiPort>,
    pub list_api: Arc<dyn ListApiPort>,

    // External widget transport / 外部组件传输
    pub external_registry: ExternalWidgetRegistry,
    pub script_host: Arc<dyn ScriptHostPort>,
    pub module_source: Arc<dyn ModuleSourcePort>,
    pub object_urls: Arc<dyn ObjectUrlPort>,
    pub module_importer: Arc<dyn ModuleImporterPort>,

    // Host container / 宿主容器
    pub host_signals: Arc<dyn HostSignalPort>,
    pub navigator: Arc<dyn ProfileNavigatorPort>,

    // System / 系统
    pub scheduler: Arc<dyn SchedulerPort>,
    pub clock: Arc<dyn ClockPort>,
}
