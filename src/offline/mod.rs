pub mod bundle;
pub mod gateway;
pub mod interceptor;
pub mod mime;
pub mod path;
pub mod rules;

pub use bundle::AssetBundle;
pub use gateway::{
    GatewayRequest, GatewayResponse, MissStrategy, OfflineGateway, ReqwestUpstream, Upstream,
    OFFLINE_ORIGIN,
};
pub use interceptor::{AssetRecord, OfflineInterceptor};
pub use mime::resolve_mime;
pub use path::{PathPattern, PathResolver};
pub use rules::InterceptRule;
