//! 选号查询表单
//!
//! 站点按字段名逐一校验，字段名和取值都必须与站点表单一致。

use serde::{Deserialize, Serialize};

use crate::error::PollError;

/// 监理站窗口及车辆类型等固定参数
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StationProfile {
    /// 监理所代码
    pub dept_code: u32,
    /// 监理站代码
    pub station_code: u32,
    /// 窗口编号
    pub window_no: String,
    /// 监理站地址
    pub location: String,
    /// 车辆类型
    pub car_type: String,
    /// 能源类型
    pub energy_type: String,
    /// 号牌类型
    pub plate_type: u32,
    /// 号牌版本
    pub plate_ver: u32,
}

impl Default for StationProfile {
    fn default() -> Self {
        Self {
            dept_code: 2,
            station_code: 20,
            window_no: "01".to_string(),
            location: "臺北市八德路4段21號地下室".to_string(),
            car_type: "C".to_string(),
            energy_type: "C".to_string(),
            plate_type: 2,
            plate_ver: 2,
        }
    }
}

/// 选号查询提交表单
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryForm {
    method: &'static str,
    sel_dept_code: u32,
    sel_station_code: u32,
    sel_window_no: String,
    location: String,
    sel_car_type: String,
    sel_energy_type: String,
    sel_plate_type: u32,
    plate_ver: u32,
    validate_str: String,
    query_type: u32,
    query_no: String,
    #[serde(rename = "CSRFToken")]
    csrf_token: String,
}

impl QueryForm {
    const METHOD: &'static str = "qryPickNo";
    const QUERY_TYPE: u32 = 2;

    /// 构建表单
    ///
    /// 验证码答案会被转为大写；号码模式、答案、令牌都不能为空。
    pub fn new(
        station: &StationProfile,
        pattern: &str,
        answer: &str,
        csrf_token: &str,
    ) -> Result<Self, PollError> {
        if pattern.trim().is_empty() {
            return Err(PollError::Protocol("查询号码模式为空".to_string()));
        }
        if answer.trim().is_empty() {
            return Err(PollError::Protocol("验证码答案为空".to_string()));
        }
        if csrf_token.is_empty() {
            return Err(PollError::Protocol("token not found".to_string()));
        }

        Ok(Self {
            method: Self::METHOD,
            sel_dept_code: station.dept_code,
            sel_station_code: station.station_code,
            sel_window_no: station.window_no.clone(),
            location: station.location.clone(),
            sel_car_type: station.car_type.clone(),
            sel_energy_type: station.energy_type.clone(),
            sel_plate_type: station.plate_type,
            plate_ver: station.plate_ver,
            validate_str: answer.trim().to_uppercase(),
            query_type: Self::QUERY_TYPE,
            query_no: pattern.to_string(),
            csrf_token: csrf_token.to_string(),
        })
    }

    pub fn validate_str(&self) -> &str {
        &self.validate_str
    }

    pub fn query_no(&self) -> &str {
        &self.query_no
    }

    pub fn csrf_token(&self) -> &str {
        &self.csrf_token
    }
}
